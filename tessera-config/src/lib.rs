//! Configuration types and TOML loading.
//!
//! This crate owns exactly the read-only surface the compositor core
//! consults: floating constraints, the floating modifier, focus-follows-mouse
//! mode, urgent timeout, popup-during-fullscreen policy, layout geometry
//! constants, and the current mode's mouse/key bindings. Parsing the wider
//! configuration language (window rules, output layout, autostart, ...) is
//! out of scope for the core and lives above this crate.

#[macro_use]
extern crate tracing;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

mod binds;
mod modifiers;

pub use binds::{Action, KeyBinding, Mode, MouseBinding, MouseButton, Region};
pub use modifiers::Modifiers;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Finds the default configuration file path (`$XDG_CONFIG_HOME/tessera/config.toml`,
/// falling back to `/etc/tessera/config.toml` if the user has none).
pub fn config_path() -> PathBuf {
    xdg::BaseDirectories::with_prefix("tessera")
        .find_config_file("config.toml")
        .unwrap_or_else(|| PathBuf::from("/etc/tessera/config.toml"))
}

/// Loads the configuration from `path`, or the default path if `None`.
///
/// Returns the parsed configuration along with the path it was loaded from,
/// so the caller can watch that exact path for changes.
pub fn load(path: Option<PathBuf>) -> Result<(Config, PathBuf), Error> {
    let path = path.unwrap_or_else(config_path);
    let contents = std::fs::read_to_string(&path)?;
    let config = toml::from_str(&contents)?;
    Ok((config, path))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub input: Input,
    pub layout: Layout,
    pub binds: Binds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: General::default(),
            input: Input::default(),
            layout: Layout::default(),
            binds: Binds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct General {
    /// Warp the cursor to the center of an output whenever it gains focus.
    pub cursor_warps: bool,
}

impl Default for General {
    fn default() -> Self {
        Self { cursor_warps: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusFollowsMouseMode {
    /// Pointer motion never changes focus.
    No,
    /// Pointer motion changes focus when entering a window different from
    /// the previously-hovered one.
    Yes,
    /// Pointer motion re-asserts focus on every motion event, even while
    /// hovering the same window.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PopupDuringFullscreen {
    /// Only raise a popup above a fullscreen window when the popup actually
    /// belongs to the fullscreen window's transient chain.
    Smart,
    /// Never raise popups above a fullscreen window.
    Ignore,
    /// Hide popups entirely while a window is fullscreen.
    Hide,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FloatingConstraints {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
}

impl Default for FloatingConstraints {
    fn default() -> Self {
        Self {
            min_width: 100,
            min_height: 50,
            max_width: i32::MAX,
            max_height: i32::MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Input {
    /// Modifier that must be held for floating-window move/resize clicks.
    pub floating_modifier: Modifiers,
    /// When set, the left/right resize-button roles used while
    /// `floating_modifier` is held are swapped.
    pub floating_modifier_inverse: bool,
    pub focus_follows_mouse: FocusFollowsMouseMode,
    /// How long a window stays marked urgent after a cross-workspace focus
    /// change lands on it, before urgency is cleared automatically. A zero
    /// duration clears urgency immediately instead of arming a timer.
    pub urgent_timeout: Duration,
    pub popup_during_fullscreen: PopupDuringFullscreen,
    pub floating_constraints: FloatingConstraints,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            floating_modifier: Modifiers::LOGO,
            floating_modifier_inverse: false,
            focus_follows_mouse: FocusFollowsMouseMode::Yes,
            urgent_timeout: Duration::from_millis(500),
            popup_during_fullscreen: PopupDuringFullscreen::Smart,
            floating_constraints: FloatingConstraints::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    /// The client draws its own decorations; the compositor adds no insets.
    Csd,
    /// No border or titlebar at all.
    None,
    /// Compositor-drawn border and titlebar.
    Normal,
}

/// Layout geometry constants consulted by the column/window arrangement
/// engine. These are not "theming" in the visual sense (colors, fonts are a
/// rendering concern outside this crate) — they are the numbers the
/// arrangement formulas in `column::arrange` and `window::arrange` need to
/// run at all.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub border_style: BorderStyle,
    pub titlebar_height: i32,
    pub border_left: i32,
    pub border_right: i32,
    pub border_top: i32,
    pub border_bottom: i32,
    /// Gap, in logical pixels, inserted between adjacent columns on an
    /// output during tiling arrangement.
    pub column_gap: i32,
    pub preview_titlebar_height: i32,
    pub preview_height_fraction: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            border_style: BorderStyle::Normal,
            titlebar_height: 30,
            border_left: 2,
            border_right: 2,
            border_top: 0,
            border_bottom: 2,
            column_gap: 8,
            preview_titlebar_height: 30,
            preview_height_fraction: 1.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Binds {
    pub modes: HashMap<String, Mode>,
    pub current_mode: String,
}

impl Binds {
    /// Bindings active in the currently-selected mode, or an empty mode if
    /// the configuration names a mode that does not exist.
    pub fn current(&self) -> Option<&Mode> {
        self.modes.get(&self.current_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_internally_consistent() {
        let config = Config::default();
        assert_eq!(config.input.floating_constraints.min_width, 100);
        assert!(config.layout.preview_height_fraction > 0.0);
        assert!(config.binds.current().is_none());
    }
}
