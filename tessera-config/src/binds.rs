use serde::Deserialize;

use crate::Modifiers;

/// The part of a window a pointer event landed on, used to match mouse
/// bindings against a `(modifiers, button, region)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Titlebar,
    Border,
    Contents,
    /// The pointer is over an output but not over any window.
    Workspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u32),
}

/// An action name. Action *execution* is outside the core's scope (it is
/// the concern of whatever wires this crate to a running compositor); the
/// core only needs to know whether a binding exists for a given trigger.
pub type Action = String;

#[derive(Debug, Clone, Deserialize)]
pub struct MouseBinding {
    #[serde(default)]
    pub modifiers: Modifiers,
    pub button: MouseButton,
    pub region: Region,
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyBinding {
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Raw X11/XKB keysym value.
    pub keysym: u32,
    pub action: Action,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Mode {
    pub mouse: Vec<MouseBinding>,
    pub key: Vec<KeyBinding>,
}

impl Mode {
    /// Finds the first mouse binding matching `modifiers`, `button`, and
    /// `region`, in declaration order — first match wins.
    pub fn match_mouse(
        &self,
        modifiers: Modifiers,
        button: MouseButton,
        region: Region,
    ) -> Option<&MouseBinding> {
        self.mouse
            .iter()
            .find(|b| b.modifiers == modifiers && b.button == button && b.region == region)
    }

    pub fn match_key(&self, modifiers: Modifiers, keysym: u32) -> Option<&KeyBinding> {
        self.key
            .iter()
            .find(|b| b.modifiers == modifiers && b.keysym == keysym)
    }
}
