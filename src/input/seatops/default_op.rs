//! The default op: nothing is grabbed, so every button press has to be
//! classified against the mouse-binding table and the click-to-action
//! priority chain before anything else runs.
//!
//! Grounded in `original_source/src/input/seatop_default.c`'s
//! `handle_button` and `get_active_mouse_binding`.

use smithay::utils::{Logical, Point};
use tessera_config::{FocusFollowsMouseMode, MouseButton, Region};

use crate::input::seatops::move_op::MoveOp;
use crate::input::seatops::resize_floating::{Edge, ResizeFloatingOp};
use crate::input::seatops::resize_tiling::ResizeTilingOp;
use crate::input::{HitRegion, HitTest, Seat, SeatOp};
use crate::tree::{Tree, WindowId, WorkspaceId};

/// Synthetic button codes standing in for a scroll direction so axis events
/// can be matched against the same `(modifiers, button, region)` mouse
/// binding table as a real button. Chosen well outside the range of real
/// `BTN_*` codes `MouseButton::Other` otherwise carries, so a configured
/// axis binding can never collide with a configured button binding.
const AXIS_SCROLL_UP: u32 = 0xA000_0001;
const AXIS_SCROLL_DOWN: u32 = 0xA000_0002;
const AXIS_SCROLL_LEFT: u32 = 0xA000_0003;
const AXIS_SCROLL_RIGHT: u32 = 0xA000_0004;

#[derive(Debug, Default)]
pub struct DefaultOp;

impl DefaultOp {
    pub fn end(&mut self, _tree: &mut Tree) {}

    /// Tries each rule in `spec.md` §4.6's priority list in order, stopping
    /// at the first match. A bound mouse action suppresses forwarding the
    /// click to the surface entirely, matching the resolved Open Question
    /// on binding-vs-forward precedence.
    pub fn button(
        seat: &mut Seat,
        tree: &mut Tree,
        workspace: WorkspaceId,
        button: MouseButton,
        pressed: bool,
    ) {
        let hit = tree.hit_test(workspace, seat.pointer_location);

        if pressed {
            if let Some(binding) = tree
                .config
                .binds
                .current()
                .and_then(|mode| mode.match_mouse(seat.pressed_modifiers, button, hit.region.into()))
            {
                let action = binding.action.clone();
                tree.push_event(crate::tree::TreeEvent::SceneChanged);
                tracing::debug!(?action, "mouse binding matched, suppressing forward");
                return;
            }
        }

        let Some(window) = hit.window else {
            if pressed {
                seat.handle.pointer_clear_focus();
            }
            return;
        };

        if !pressed {
            seat.handle.pointer_notify_button(button, false);
            return;
        }

        let floating = tree.window_is_floating(window);
        let fullscreen = tree.window_is_fullscreen(window);
        let floating_modifier = tree.config.input.floating_modifier;
        let modifier_held = !seat.pressed_modifiers.is_empty() && seat.pressed_modifiers == floating_modifier;

        if !floating && hit.region == HitRegion::Border && button == MouseButton::Left {
            let edge = Self::edge_for_point(tree, window, seat.pointer_location);
            seat.begin_op(
                tree,
                SeatOp::ResizeTiling(ResizeTilingOp::new(window, edge, seat.pointer_location, button)),
            );
            return;
        }

        if !floating && modifier_held && Self::is_resize_button(tree, button) {
            let edge = Self::edge_for_point(tree, window, seat.pointer_location);
            seat.begin_op(
                tree,
                SeatOp::ResizeTiling(ResizeTilingOp::new(window, edge, seat.pointer_location, button)),
            );
            return;
        }

        if floating && !fullscreen && (modifier_held || hit.region == HitRegion::Titlebar) && Self::is_move_button(tree, button) {
            seat.begin_op(tree, SeatOp::Move(MoveOp::new(window, seat.pointer_location, button)));
            return;
        }

        if floating && !fullscreen && ((hit.region == HitRegion::Border && button == MouseButton::Left) || (modifier_held && Self::is_resize_button(tree, button))) {
            let edge = Self::edge_for_point(tree, window, seat.pointer_location);
            seat.begin_op(
                tree,
                SeatOp::ResizeFloating(ResizeFloatingOp::new(window, edge, seat.pointer_location, button)),
            );
            return;
        }

        if !floating && (modifier_held || hit.region == HitRegion::Titlebar) {
            seat.begin_op(tree, SeatOp::Move(MoveOp::new(window, seat.pointer_location, button)));
            return;
        }

        if hit.region == HitRegion::Contents {
            seat.begin_op(
                tree,
                SeatOp::Down(crate::input::seatops::down_op::DownOp::new(window, button)),
            );
            seat.handle.pointer_notify_button(button, true);
            return;
        }

        seat.handle.pointer_notify_button(button, true);
    }

    /// Pointer motion while nothing is grabbed: forwards position to the
    /// hovered surface (or clears pointer focus over the workspace gap),
    /// then, per `config.input.focus_follows_mouse`, possibly moves keyboard
    /// focus to follow. `Layer` surfaces sit above the tree entirely and are
    /// the caller's responsibility to prioritize ahead of this; this only
    /// ever decides whether to focus the hovered window.
    pub fn pointer_motion(seat: &mut Seat, tree: &mut Tree, workspace: WorkspaceId) {
        let hit = tree.hit_test(workspace, seat.pointer_location);

        match hit.window {
            Some(_) => seat.handle.pointer_notify_motion(hit.surface_local),
            None => seat.handle.pointer_clear_focus(),
        }

        let mode = tree.config.input.focus_follows_mouse;
        if mode == FocusFollowsMouseMode::No {
            return;
        }
        // The workspace gap has no window to focus onto; this model only
        // ever moves focus onto a hovered window, never clears it.
        let Some(window) = hit.window else {
            return;
        };
        if mode == FocusFollowsMouseMode::Always || tree.root_get_focused_window() != Some(window) {
            tree.root_set_focused_window(window);
        }
    }

    /// Scroll-wheel / touchpad axis events: framed as a synthetic
    /// press-then-release of a direction-specific button around the scroll,
    /// so they are matched against mouse bindings exactly like a real
    /// button click (region semantics included). A matched binding
    /// suppresses forwarding entirely, per the resolved Open Question on
    /// binding-vs-forward precedence; otherwise the event reaches the
    /// surface unchanged.
    pub fn pointer_axis(seat: &mut Seat, tree: &mut Tree, workspace: WorkspaceId, horizontal: f64, vertical: f64) {
        let hit = tree.hit_test(workspace, seat.pointer_location);

        if let Some(button) = Self::axis_button(horizontal, vertical) {
            if let Some(binding) = tree
                .config
                .binds
                .current()
                .and_then(|mode| mode.match_mouse(seat.pressed_modifiers, button, hit.region.into()))
            {
                let action = binding.action.clone();
                tree.push_event(crate::tree::TreeEvent::SceneChanged);
                tracing::debug!(?action, "mouse binding matched on axis, suppressing forward");
                return;
            }
        }

        seat.handle.pointer_notify_axis(horizontal, vertical);
    }

    /// Picks the synthetic button standing in for this axis event's
    /// dominant direction; vertical motion takes precedence over
    /// horizontal, matching the source's axis-source priority. `None` for a
    /// zero-magnitude event (nothing to bind).
    fn axis_button(horizontal: f64, vertical: f64) -> Option<MouseButton> {
        if vertical > 0.0 {
            Some(MouseButton::Other(AXIS_SCROLL_DOWN))
        } else if vertical < 0.0 {
            Some(MouseButton::Other(AXIS_SCROLL_UP))
        } else if horizontal > 0.0 {
            Some(MouseButton::Other(AXIS_SCROLL_RIGHT))
        } else if horizontal < 0.0 {
            Some(MouseButton::Other(AXIS_SCROLL_LEFT))
        } else {
            None
        }
    }

    fn is_move_button(tree: &Tree, button: MouseButton) -> bool {
        let _ = tree;
        button == MouseButton::Left
    }

    fn is_resize_button(tree: &Tree, button: MouseButton) -> bool {
        let _ = tree;
        button == MouseButton::Right
    }

    /// Quadrant-based edge derivation, reused verbatim by both resize ops:
    /// the cursor's position relative to the window's center picks the
    /// horizontal and vertical edge being dragged.
    pub fn edge_for_point(tree: &Tree, window: WindowId, point: Point<f64, Logical>) -> Edge {
        let Some(geometry) = tree.window_get_box(window) else {
            return Edge { left: false, right: true, top: false, bottom: true };
        };
        let geometry = geometry.to_f64();
        let center_x = geometry.loc.x + geometry.size.w / 2.0;
        let center_y = geometry.loc.y + geometry.size.h / 2.0;
        Edge {
            left: point.x <= center_x,
            right: point.x > center_x,
            top: point.y <= center_y,
            bottom: point.y > center_y,
        }
    }
}

pub(crate) fn hit_test_region(hit: &HitTest) -> Region {
    hit.region.into()
}
