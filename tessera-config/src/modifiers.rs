use serde::{Deserialize, Deserializer};

bitflags::bitflags! {
    /// Keyboard modifier mask used to match bindings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const LOGO  = 1 << 3;
    }
}

impl<'de> Deserialize<'de> for Modifiers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut modifiers = Modifiers::empty();
        for name in names {
            modifiers |= match name.to_ascii_lowercase().as_str() {
                "shift" => Modifiers::SHIFT,
                "ctrl" | "control" => Modifiers::CTRL,
                "alt" => Modifiers::ALT,
                "super" | "logo" | "mod4" => Modifiers::LOGO,
                other => {
                    return Err(serde::de::Error::unknown_variant(
                        other,
                        &["shift", "ctrl", "alt", "super"],
                    ))
                }
            };
        }
        Ok(modifiers)
    }
}
