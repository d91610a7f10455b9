//! The managed client-view instance: double-buffered, owns a scene subtree,
//! and carries the outer/content geometry contract every layout formula in
//! `column.rs`/`workspace.rs` ultimately derives.

use smithay::utils::{Logical, Rectangle, Serial};
use tessera_config::BorderStyle;

use super::column::ColumnLayout;
use super::ids::{ColumnId, OutputId, WindowId, WorkspaceId};
use super::scene::{SceneFactory, SceneNode};
use super::theme::{ThemeHandle, ThemeRole};
use super::view::{View, ViewKind};
use super::{Tree, TreeEvent};
use crate::signal::Signal;

/// One of the three double-buffered records a [`Window`] carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowState {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub content_x: i32,
    pub content_y: i32,
    pub content_width: i32,
    pub content_height: i32,
    pub titlebar_height: i32,
    pub border_left: i32,
    pub border_right: i32,
    pub border_top: i32,
    pub border_bottom: i32,
    pub fullscreen: bool,
    pub shaded: bool,
    pub focused: bool,
    pub moving: bool,
    pub resizing: bool,
    pub tiled: bool,
    pub dead: bool,
    /// Share of a SPLIT column's available content height this window
    /// claims; meaningless outside a SPLIT column.
    pub height_fraction: f64,
    pub parent: Option<ColumnId>,
    pub workspace: Option<WorkspaceId>,
    pub output: Option<OutputId>,
}

impl WindowState {
    fn outer_box(&self) -> Rectangle<i32, Logical> {
        Rectangle::new((self.x, self.y).into(), (self.width, self.height).into())
    }

    pub(crate) fn outer_box_f64(&self) -> Rectangle<f64, Logical> {
        self.outer_box().to_f64()
    }

    pub(crate) fn content_box_f64(&self) -> Rectangle<f64, Logical> {
        Rectangle::new(
            (self.content_x, self.content_y).into(),
            (self.content_width, self.content_height).into(),
        )
        .to_f64()
    }
}

pub struct Window {
    pub id: WindowId,
    pub view: Box<dyn View>,
    pub title: String,
    pub scene: Box<dyn SceneNode>,
    pub theme: Option<ThemeHandle>,
    pub saved_floating_geometry: Option<Rectangle<i32, Logical>>,
    pub is_configuring: bool,
    pub pending_configure_serial: Option<Serial>,
    dirty: bool,

    pub begin_destroy_signal: Signal<WindowId>,
    pub destroy_signal: Signal<WindowId>,

    pub pending: WindowState,
    pub committed: WindowState,
    pub current: WindowState,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("pending", &self.pending)
            .finish()
    }
}

impl Tree {
    /// Constructs a window's scene subtree and registers it for dirty
    /// propagation. Mirrors `window_create`.
    pub fn window_create(&mut self, view: Box<dyn View>, factory: &mut dyn SceneFactory) -> WindowId {
        let kind = view.kind();
        let id = self.windows.insert_with_key(|id| Window {
            id,
            view,
            title: String::new(),
            scene: factory.create_subtree(),
            theme: None,
            saved_floating_geometry: None,
            is_configuring: false,
            pending_configure_serial: None,
            dirty: false,
            begin_destroy_signal: Signal::new(),
            destroy_signal: Signal::new(),
            pending: WindowState {
                height_fraction: 1.0,
                tiled: matches!(kind, ViewKind::XdgShell),
                ..Default::default()
            },
            committed: WindowState::default(),
            current: WindowState::default(),
        });
        self.window_set_dirty(id);
        id
    }

    /// Idempotent. Marks the window for destruction and immediately detaches
    /// it and cancels any seat operation referencing it; the record itself
    /// is freed two transaction phases later, in `window_handle_after_apply`.
    pub fn window_begin_destroy(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if window.pending.dead {
            return;
        }
        window.pending.dead = true;
        window.begin_destroy_signal.emit(&id);
        self.push_event(TreeEvent::WindowBeginDestroy(id));

        if let Some(column) = self.windows[id].pending.parent {
            self.column_remove_child(column, id);
        } else if let Some(workspace) = self.windows[id].pending.workspace {
            self.workspace_remove_floating(workspace, id);
        }
        self.window_set_dirty(id);
    }

    /// Idempotent within a round: registers the window with the transaction
    /// manager and cascades to the window's own committed/pending state (a
    /// leaf has no children to cascade to, but still needs re-registration
    /// every round it mutates).
    pub fn window_set_dirty(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if window.dirty {
            return;
        }
        window.dirty = true;
        self.transaction.register(id.into());
        self.transaction.ensure_queued();
    }

    pub(crate) fn window_clear_dirty(&mut self, id: WindowId) {
        if let Some(window) = self.windows.get_mut(id) {
            window.dirty = false;
        }
    }

    pub fn window_is_alive(&self, id: WindowId) -> bool {
        self.windows.get(id).is_some_and(|w| !w.current.dead)
    }

    pub fn window_is_floating(&self, id: WindowId) -> bool {
        self.windows
            .get(id)
            .is_some_and(|w| w.pending.parent.is_none() && w.pending.workspace.is_some())
    }

    pub fn window_is_tiling(&self, id: WindowId) -> bool {
        self.windows
            .get(id)
            .is_some_and(|w| w.pending.parent.is_some())
    }

    pub fn window_is_fullscreen(&self, id: WindowId) -> bool {
        self.windows.get(id).is_some_and(|w| w.pending.fullscreen)
    }

    pub fn window_get_output(&self, id: WindowId) -> Option<OutputId> {
        self.windows.get(id).and_then(|w| w.pending.output)
    }

    pub fn window_get_box(&self, id: WindowId) -> Option<Rectangle<i32, Logical>> {
        self.windows.get(id).map(|w| w.pending.outer_box())
    }

    pub fn window_get_previous_sibling(&self, id: WindowId) -> Option<WindowId> {
        let column = self.windows.get(id)?.pending.parent?;
        let children = &self.columns[column].children;
        let idx = children.iter().position(|&c| c == id)?;
        idx.checked_sub(1).map(|i| children[i])
    }

    pub fn window_get_next_sibling(&self, id: WindowId) -> Option<WindowId> {
        let column = self.windows.get(id)?.pending.parent?;
        let children = &self.columns[column].children;
        let idx = children.iter().position(|&c| c == id)?;
        children.get(idx + 1).copied()
    }

    /// Whether `descendant`'s view is transient for `ancestor`'s, gated by
    /// the configured popup-during-fullscreen policy: only `Smart` ever
    /// allows a popup to be considered transient for purposes of raising it
    /// above a fullscreen window.
    pub fn window_is_transient_for(&self, descendant: WindowId, ancestor: WindowId) -> bool {
        if self.config.input.popup_during_fullscreen != tessera_config::PopupDuringFullscreen::Smart
        {
            return false;
        }
        let Some(descendant) = self.windows.get(descendant) else {
            return false;
        };
        let Some(ancestor) = self.windows.get(ancestor) else {
            return false;
        };
        descendant.view.is_transient_for(ancestor.view.as_ref())
    }

    /// Recomputes parent-derived fields for a window now tiled under
    /// `column`: workspace/output mirror the column's, and `focused` is
    /// true only if the column itself is the workspace's active column
    /// while the workspace is visible in tiling focus mode.
    pub fn window_reconcile_tiling(&mut self, id: WindowId, column: ColumnId) {
        let (workspace, output, column_focused) = {
            let col = &self.columns[column];
            (col.pending.workspace, col.pending.output, col.pending.focused)
        };
        let window = &mut self.windows[id];
        window.pending.parent = Some(column);
        window.pending.workspace = workspace;
        window.pending.output = output;
        window.pending.tiled = true;
        window.pending.focused = column_focused;
        self.window_resolve_theme(id);
        self.window_handle_fullscreen_reparent(id);
        self.window_set_dirty(id);
    }

    pub fn window_reconcile_floating(&mut self, id: WindowId, workspace: WorkspaceId) {
        let (output, ws_focused, is_active) = {
            let ws = &self.workspaces[workspace];
            (
                ws.pending.output,
                ws.pending.focused,
                ws.pending.focus_mode == super::workspace::FocusMode::Floating
                    && ws.pending.active_floating == Some(id),
            )
        };
        let window = &mut self.windows[id];
        window.pending.parent = None;
        window.pending.workspace = Some(workspace);
        window.pending.output = output;
        window.pending.tiled = false;
        window.pending.focused = ws_focused && is_active;
        self.window_resolve_theme(id);
        self.window_handle_fullscreen_reparent(id);
        self.window_set_dirty(id);
    }

    pub fn window_reconcile_detached(&mut self, id: WindowId) {
        let window = &mut self.windows[id];
        window.pending.parent = None;
        window.pending.workspace = None;
        window.pending.output = None;
        window.pending.focused = false;
        self.window_set_dirty(id);
    }

    /// Resolves this window's `(role, state)` theme from its current
    /// container and focus, and mirrors the resolved border style into the
    /// concrete titlebar/border insets `window_arrange` consumes. Every
    /// `reconcile_*` path that attaches a window to a column or a
    /// workspace's floating list calls this, since both the role and the
    /// insets depend entirely on the container just assigned — this mirrors
    /// `original_source/src/tree/window.c`'s `window_update_theme` being
    /// called from the same reconcile sites.
    fn window_resolve_theme(&mut self, id: WindowId) {
        let layout = self.config.layout;
        let (role, active) = match self.windows[id].pending.parent {
            Some(column) => {
                let col = &self.columns[column].pending;
                let is_active = col.active_child == Some(id);
                let role = if col.layout == ColumnLayout::Stacked && is_active {
                    ThemeRole::TilingHead
                } else {
                    ThemeRole::Tiling
                };
                (role, is_active)
            }
            None => {
                let active = self.windows[id]
                    .pending
                    .workspace
                    .is_some_and(|ws| self.workspaces[ws].pending.active_floating == Some(id));
                (ThemeRole::Floating, active)
            }
        };

        let window = &mut self.windows[id];
        let urgent = window.view.is_urgent();
        let focused = window.pending.focused;
        let theme = ThemeHandle::resolve(role, urgent, focused, active, layout.border_style);
        window.theme = Some(theme);

        let state = &mut window.pending;
        match layout.border_style {
            BorderStyle::Csd | BorderStyle::None => {
                state.titlebar_height = 0;
                state.border_left = 0;
                state.border_right = 0;
                state.border_top = 0;
                state.border_bottom = 0;
            }
            BorderStyle::Normal => {
                state.titlebar_height = layout.titlebar_height;
                state.border_left = layout.border_left;
                state.border_right = layout.border_right;
                state.border_top = layout.border_top;
                state.border_bottom = layout.border_bottom;
            }
        }
    }

    /// Whenever a window's parent/workspace changes while it is fullscreen,
    /// any other window fullscreen on the (possibly new) output must be
    /// unfullscreened, and the destination workspace rearranged.
    pub fn window_handle_fullscreen_reparent(&mut self, id: WindowId) {
        if !self.windows[id].pending.fullscreen {
            return;
        }
        let Some(output) = self.windows[id].pending.output else {
            return;
        };
        let others: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|(other, w)| {
                *other != id && w.pending.fullscreen && w.pending.output == Some(output)
            })
            .map(|(other, _)| other)
            .collect();
        for other in others {
            self.window_set_fullscreen(other, false);
        }
        if let Some(workspace) = self.windows[id].pending.workspace {
            self.workspace_arrange(workspace);
        }
    }

    /// Enables or disables fullscreen. Enabling saves the current floating
    /// geometry (so it can be restored later) and keeps the window's
    /// current output regardless of its column's output. Disabling a tiling
    /// window rebinds it to its column's current output.
    pub fn window_set_fullscreen(&mut self, id: WindowId, fullscreen: bool) {
        let window = &mut self.windows[id];
        if window.pending.fullscreen == fullscreen {
            return;
        }
        if fullscreen {
            if window.pending.parent.is_none() {
                window.saved_floating_geometry = Some(window.pending.outer_box());
            }
            window.pending.fullscreen = true;
        } else {
            window.pending.fullscreen = false;
            if let Some(geometry) = window.saved_floating_geometry.take() {
                if window.pending.parent.is_none() {
                    window.pending.x = geometry.loc.x;
                    window.pending.y = geometry.loc.y;
                    window.pending.width = geometry.size.w;
                    window.pending.height = geometry.size.h;
                }
            }
            if let Some(column) = window.pending.parent {
                let output = self.columns[column].pending.output;
                self.windows[id].pending.output = output;
            }
        }
        self.window_handle_fullscreen_reparent(id);
        self.window_set_dirty(id);
        if let Some(workspace) = self.windows[id].pending.workspace {
            if self.workspaces[workspace].pending.focused {
                self.workspace_arrange(workspace);
            }
        }
    }

    pub fn window_set_resizing(&mut self, id: WindowId, resizing: bool) {
        let window = &mut self.windows[id];
        window.pending.resizing = resizing;
        window.view.set_resizing(resizing);
        self.window_set_dirty(id);
    }

    /// Clamps a candidate outer size to the configured floating
    /// constraints.
    pub fn floating_calculate_constraints(&self, width: i32, height: i32) -> (i32, i32) {
        let c = &self.config.input.floating_constraints;
        (width.clamp(c.min_width, c.max_width), height.clamp(c.min_height, c.max_height))
    }

    /// 0.5 x usable width, 0.75 x usable height, clamped to the floating
    /// constraints.
    pub fn window_floating_set_default_size(&mut self, id: WindowId) {
        let Some(output) = self.windows[id].pending.output else {
            return;
        };
        let usable = self.outputs[output].pending.usable_area;
        let (w, h) = self.floating_calculate_constraints(
            (usable.size.w as f64 * 0.5).round() as i32,
            (usable.size.h as f64 * 0.75).round() as i32,
        );
        let window = &mut self.windows[id];
        window.pending.width = w;
        window.pending.height = h;
        self.window_set_dirty(id);
    }

    /// Resizes to the view's natural size (clamped) and centers on the
    /// window's output; if the natural size would not fit, falls back to
    /// the output's full usable box.
    pub fn window_floating_resize_and_center(&mut self, id: WindowId) {
        let Some(output) = self.windows[id].pending.output else {
            return;
        };
        let usable = self.outputs[output].pending.usable_area;
        let natural = self.windows[id].view.natural_size();
        let (w, h) = self.floating_calculate_constraints(natural.w, natural.h);
        let (w, h) = if w > usable.size.w || h > usable.size.h {
            (usable.size.w, usable.size.h)
        } else {
            (w, h)
        };
        let window = &mut self.windows[id];
        window.pending.width = w;
        window.pending.height = h;
        self.window_floating_move_to_center(id);
    }

    pub fn window_floating_move_to(&mut self, id: WindowId, x: i32, y: i32) {
        let window = &mut self.windows[id];
        window.pending.x = x;
        window.pending.y = y;
        self.window_set_dirty(id);
    }

    pub fn window_floating_move_to_center(&mut self, id: WindowId) {
        let Some(output) = self.windows[id].pending.output else {
            return;
        };
        let usable = self.outputs[output].pending.usable_area;
        let window = &self.windows[id];
        let x = usable.loc.x + (usable.size.w - window.pending.width) / 2;
        let y = usable.loc.y + (usable.size.h - window.pending.height) / 2;
        self.window_floating_move_to(id, x, y);
    }

    /// Inverse of `window_arrange`'s inset derivation: recomputes the outer
    /// geometry that would produce `content` given the window's current
    /// theme and fullscreen state.
    pub fn window_set_geometry_from_content(&mut self, id: WindowId, content: Rectangle<i32, Logical>) {
        let window = &mut self.windows[id];
        if window.pending.fullscreen {
            window.pending.x = content.loc.x;
            window.pending.y = content.loc.y;
            window.pending.width = content.size.w;
            window.pending.height = content.size.h;
            self.window_set_dirty(id);
            return;
        }
        let style = window
            .theme
            .map(|t| t.border_style)
            .unwrap_or(BorderStyle::Normal);
        let (border_left, border_right, border_top, border_bottom, titlebar_height) = match style {
            BorderStyle::Csd | BorderStyle::None => (0, 0, 0, 0, 0),
            BorderStyle::Normal => (
                window.pending.border_left,
                window.pending.border_right,
                window.pending.border_top,
                window.pending.border_bottom,
                window.pending.titlebar_height,
            ),
        };
        window.pending.x = content.loc.x - border_left;
        window.pending.y = content.loc.y - titlebar_height - border_top;
        window.pending.width = content.size.w + border_left + border_right;
        window.pending.height = titlebar_height + content.size.h + border_top + border_bottom;
        self.window_set_dirty(id);
    }

    pub fn window_raise_floating(&mut self, id: WindowId) {
        if let Some(workspace) = self.windows[id].pending.workspace {
            self.workspace_raise_floating(workspace, id);
        }
    }

    /// Derives `content_{x,y,width,height}` from the outer box: fullscreen
    /// windows get no insets at all; otherwise the titlebar/border geometry
    /// is subtracted, clamped to zero so a too-small outer box never yields
    /// negative content dimensions.
    pub fn window_arrange(&mut self, id: WindowId) {
        let window = &mut self.windows[id];
        let state = &mut window.pending;
        if state.fullscreen {
            state.content_x = state.x;
            state.content_y = state.y;
            state.content_width = state.width;
            state.content_height = state.height;
        } else {
            state.content_x = state.x + state.border_left;
            state.content_y = state.y + state.titlebar_height + state.border_top;
            state.content_width =
                (state.width - state.border_left - state.border_right).max(0);
            state.content_height =
                (state.height - state.titlebar_height - state.border_top - state.border_bottom)
                    .max(0);
        }
        self.window_set_dirty(id);
    }

    /// Whether a configure is actually required: XWayland clients position
    /// themselves, so any outer-position change (not just a size change)
    /// needs a round-trip; XDG shell clients are compositor-positioned, so
    /// only a content-size change does.
    fn window_should_configure(&self, id: WindowId) -> bool {
        let window = &self.windows[id];
        let p = &window.pending;
        let c = &window.committed;
        if p.fullscreen != c.fullscreen {
            return true;
        }
        let size_changed = p.content_width != c.content_width || p.content_height != c.content_height;
        let position_changed = window.view.kind() == ViewKind::Xwayland
            && (p.content_x != c.content_x || p.content_y != c.content_y);
        size_changed || position_changed
    }

    /// Whether the window is currently visible (has a live workspace that
    /// is itself reachable from an enabled output) and thus worth freezing
    /// a buffer / acquiring a commit lock for.
    fn window_is_visible(&self, id: WindowId) -> bool {
        let Some(workspace) = self.windows[id].pending.workspace else {
            return false;
        };
        self.workspaces
            .get(workspace)
            .is_some_and(|ws| !ws.pending.dead)
    }

    pub(crate) fn window_handle_commit(&mut self, id: WindowId) {
        let should_configure = self.window_should_configure(id);
        let visible = self.window_is_visible(id);
        let window = &mut self.windows[id];
        window.committed = window.pending;
        let hidden = window.committed.dead || !visible;

        if should_configure {
            let geometry = Rectangle::new(
                (window.committed.content_x, window.committed.content_y).into(),
                (window.committed.content_width, window.committed.content_height).into(),
            );
            let serial = window.view.configure(geometry);
            window.pending_configure_serial = Some(serial);
            if !hidden {
                self.transaction.acquire_commit_lock();
                let window = &mut self.windows[id];
                window.is_configuring = true;
            }
            self.windows[id].view.send_frame_done();
        }
        if !hidden {
            self.windows[id].view.freeze_buffer();
        }
    }

    pub(crate) fn window_handle_apply(&mut self, id: WindowId) {
        let window = &mut self.windows[id];
        window.is_configuring = false;
        window.scene.set_position((window.committed.x, window.committed.y).into());
        window
            .scene
            .set_size((window.committed.width, window.committed.height).into());
        window.scene.set_enabled(!window.committed.dead);
        window.view.unfreeze_buffer();
        if window.committed.dead {
            self.transaction.schedule_after_apply(id.into());
        }
        let window = &mut self.windows[id];
        window.current = window.committed;
    }

    pub(crate) fn window_handle_after_apply(&mut self, id: WindowId) {
        debug_assert!(self.windows[id].current.dead);
        if let Some(window) = self.windows.get_mut(id) {
            window.scene.destroy();
            window.destroy_signal.emit(&id);
        }
        self.windows.remove(id);
        self.push_event(TreeEvent::WindowDestroyed(id));
    }

    /// Called when an acknowledged client commit matches the outstanding
    /// configure (by serial for XDG shell, or by exact geometry for
    /// XWayland). Releases the round's commit lock.
    pub fn window_end_configure(&mut self, id: WindowId) {
        if let Some(window) = self.windows.get_mut(id) {
            if window.is_configuring {
                window.is_configuring = false;
                self.transaction.release_commit_lock();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{MockFactory, MockView};
    use super::*;

    fn make_tree() -> Tree {
        Tree::new(std::rc::Rc::new(tessera_config::Config::default()))
    }

    #[test]
    fn arrange_derives_content_box_from_theme_insets() {
        let mut tree = make_tree();
        let id = tree.window_create(Box::new(MockView::xdg(800, 600)), &mut MockFactory);
        {
            let w = &mut tree.windows[id];
            w.pending.x = 0;
            w.pending.y = 0;
            w.pending.width = 400;
            w.pending.height = 300;
            w.pending.titlebar_height = 30;
            w.pending.border_left = 2;
            w.pending.border_right = 2;
            w.pending.border_top = 0;
            w.pending.border_bottom = 2;
        }
        tree.window_arrange(id);
        let w = &tree.windows[id];
        assert_eq!(w.pending.content_x, 2);
        assert_eq!(w.pending.content_y, 30);
        assert_eq!(w.pending.content_width, 396);
        assert_eq!(w.pending.content_height, 268);
    }

    #[test]
    fn arrange_clamps_negative_content_to_zero() {
        let mut tree = make_tree();
        let id = tree.window_create(Box::new(MockView::xdg(800, 600)), &mut MockFactory);
        {
            let w = &mut tree.windows[id];
            w.pending.width = 2;
            w.pending.height = 2;
            w.pending.titlebar_height = 30;
            w.pending.border_left = 2;
            w.pending.border_right = 2;
        }
        tree.window_arrange(id);
        let w = &tree.windows[id];
        assert_eq!(w.pending.content_width, 0);
        assert_eq!(w.pending.content_height, 0);
    }

    #[test]
    fn fullscreen_arrange_has_no_insets() {
        let mut tree = make_tree();
        let id = tree.window_create(Box::new(MockView::xdg(800, 600)), &mut MockFactory);
        {
            let w = &mut tree.windows[id];
            w.pending.x = 10;
            w.pending.y = 10;
            w.pending.width = 400;
            w.pending.height = 300;
            w.pending.fullscreen = true;
            w.pending.titlebar_height = 30;
        }
        tree.window_arrange(id);
        let w = &tree.windows[id];
        assert_eq!(w.pending.content_x, 10);
        assert_eq!(w.pending.content_width, 400);
    }

    #[test]
    fn set_geometry_from_content_round_trips_outer_geometry() {
        let mut tree = make_tree();
        let id = tree.window_create(Box::new(MockView::xdg(800, 600)), &mut MockFactory);
        {
            let w = &mut tree.windows[id];
            w.pending.titlebar_height = 30;
            w.pending.border_left = 2;
            w.pending.border_right = 2;
            w.pending.border_top = 0;
            w.pending.border_bottom = 2;
            w.theme = Some(ThemeHandle {
                role: super::super::theme::ThemeRole::Floating,
                state: super::super::theme::ThemeState::Active,
                border_style: BorderStyle::Normal,
            });
        }
        tree.window_arrange(id);
        let content = Rectangle::new((50, 50).into(), (200, 200).into());
        tree.window_set_geometry_from_content(id, content);
        tree.window_arrange(id);
        let w = &tree.windows[id];
        assert_eq!(w.pending.content_x, content.loc.x);
        assert_eq!(w.pending.content_y, content.loc.y);
        assert_eq!(w.pending.content_width, content.size.w);
        assert_eq!(w.pending.content_height, content.size.h);
    }

    #[test]
    fn begin_destroy_is_idempotent() {
        let mut tree = make_tree();
        let id = tree.window_create(Box::new(MockView::xdg(800, 600)), &mut MockFactory);
        tree.window_begin_destroy(id);
        tree.window_begin_destroy(id);
        assert!(tree.windows[id].pending.dead);
    }
}
