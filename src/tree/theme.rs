//! Theme resolution: picking the border/titlebar treatment a window should
//! use from its container role and focus state.
//!
//! A window's theme is a non-owning selector, not a scene handle — it only
//! tells `Window::arrange` which geometry constants and border style to use.
//! Visual theming (colors) is a rendering concern outside this crate's
//! scope; `tessera_config::Layout` carries the geometry constants every
//! role currently shares (see DESIGN.md for this simplification).

use tessera_config::BorderStyle;

/// The container role a window currently plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeRole {
    /// The single visible child of a STACKED column (its titlebar doubles
    /// as the column's header).
    TilingHead,
    /// A non-active child of a STACKED column, or any child of a SPLIT
    /// column.
    Tiling,
    Floating,
}

/// Precedence, highest first: urgent beats focused beats active beats
/// inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ThemeState {
    Inactive,
    Active,
    Focused,
    Urgent,
}

impl ThemeState {
    /// Resolves the single highest-precedence state from independent flags.
    pub fn resolve(urgent: bool, focused: bool, active: bool) -> Self {
        if urgent {
            ThemeState::Urgent
        } else if focused {
            ThemeState::Focused
        } else if active {
            ThemeState::Active
        } else {
            ThemeState::Inactive
        }
    }
}

/// A resolved (role, state) pair plus the border style to apply. This is
/// what `Window::theme` holds; it is recomputed on every `reconcile_*` call
/// rather than cached across container changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeHandle {
    pub role: ThemeRole,
    pub state: ThemeState,
    pub border_style: BorderStyle,
}

impl ThemeHandle {
    pub fn resolve(
        role: ThemeRole,
        urgent: bool,
        focused: bool,
        active: bool,
        configured_style: BorderStyle,
    ) -> Self {
        Self {
            role,
            state: ThemeState::resolve(urgent, focused, active),
            border_style: configured_style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgent_beats_everything() {
        assert_eq!(ThemeState::resolve(true, true, true), ThemeState::Urgent);
        assert_eq!(ThemeState::resolve(false, true, true), ThemeState::Focused);
        assert_eq!(ThemeState::resolve(false, false, true), ThemeState::Active);
        assert_eq!(
            ThemeState::resolve(false, false, false),
            ThemeState::Inactive
        );
    }
}
