//! A column of stacked windows: the SPLIT/STACKED container that sits
//! directly under a workspace's tiling list.

use smithay::utils::{Logical, Rectangle};

use super::ids::{ColumnId, OutputId, WindowId, WorkspaceId};
use super::{Tree, TreeEvent};
use crate::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    Split,
    Stacked,
}

#[derive(Debug, Clone, Default)]
pub struct ColumnState {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub children: Vec<WindowId>,
    pub active_child: Option<WindowId>,
    pub layout: ColumnLayout,
    pub width_fraction: f64,
    pub focused: bool,
    pub resizing: bool,
    pub dead: bool,
    pub workspace: Option<WorkspaceId>,
    pub output: Option<OutputId>,

    /// Whether a drag-insertion preview is currently shown in this column.
    pub show_preview: bool,
    /// The child the preview would be inserted before, or `None` to mean
    /// "at the end".
    pub preview_target: Option<WindowId>,
    pub preview_box: Rectangle<i32, Logical>,
    /// Where, in output-local layout coordinates, the dragged window's
    /// anchor point currently is; the preview slot is chosen as whichever
    /// gap keeps `preview_baseline` closest to this.
    pub preview_anchor_y: f64,
    /// Offset from the top of the preview box to its own anchor point.
    pub preview_baseline: f64,
    pub preview_height_fraction: f64,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout::Stacked
    }
}

pub struct Column {
    pub id: ColumnId,
    dirty: bool,
    pub begin_destroy_signal: Signal<ColumnId>,
    pub destroy_signal: Signal<ColumnId>,
    pub pending: ColumnState,
    pub committed: ColumnState,
    pub current: ColumnState,
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("children", &self.pending.children.len())
            .finish()
    }
}

impl Tree {
    pub fn column_create(&mut self) -> ColumnId {
        let preview_height_fraction = self.config.layout.preview_height_fraction;
        self.columns.insert_with_key(|id| Column {
            id,
            dirty: false,
            begin_destroy_signal: Signal::new(),
            destroy_signal: Signal::new(),
            pending: ColumnState {
                layout: ColumnLayout::Stacked,
                width_fraction: 1.0,
                preview_height_fraction,
                ..Default::default()
            },
            committed: ColumnState::default(),
            current: ColumnState::default(),
        })
    }

    pub fn column_is_alive(&self, id: ColumnId) -> bool {
        self.columns.get(id).is_some_and(|c| !c.pending.dead)
    }

    fn column_detach(&mut self, id: ColumnId) {
        if let Some(workspace) = self.columns[id].pending.workspace {
            self.workspace_remove_column(workspace, id);
        }
    }

    fn column_begin_destroy(&mut self, id: ColumnId) {
        let Some(column) = self.columns.get_mut(id) else {
            return;
        };
        if column.pending.dead {
            return;
        }
        column.pending.dead = true;
        self.column_detach(id);
        self.columns[id].begin_destroy_signal.emit(&id);
        self.column_set_dirty(id);
    }

    /// Destroys the column once it has no children left, and recursively
    /// asks its (former) workspace to consider destroying itself too.
    pub fn column_consider_destroy(&mut self, id: ColumnId) {
        let Some(column) = self.columns.get(id) else {
            return;
        };
        if !column.pending.children.is_empty() {
            return;
        }
        let workspace = column.pending.workspace;
        self.column_begin_destroy(id);
        if let Some(workspace) = workspace {
            self.workspace_consider_destroy(workspace);
        }
    }

    pub fn column_set_dirty(&mut self, id: ColumnId) {
        let Some(column) = self.columns.get_mut(id) else {
            return;
        };
        if column.dirty {
            return;
        }
        column.dirty = true;
        self.transaction.register(id.into());
        self.transaction.ensure_queued();

        let committed_children = self.columns[id].committed.children.clone();
        for child in committed_children {
            if self.window_is_alive(child) {
                self.window_set_dirty(child);
            }
        }
        let pending_children = self.columns[id].pending.children.clone();
        for child in pending_children {
            self.window_set_dirty(child);
        }
    }

    pub(crate) fn column_clear_dirty(&mut self, id: ColumnId) {
        if let Some(column) = self.columns.get_mut(id) {
            column.dirty = false;
        }
    }

    /// Rebinds a column (and cascades to its children) to a workspace and
    /// output; `focused` tracks whether the workspace is visible, in tiling
    /// focus mode, and has this column active.
    pub fn column_reconcile(&mut self, id: ColumnId, workspace: WorkspaceId, output: Option<OutputId>) {
        let focused = {
            let ws = &self.workspaces[workspace];
            ws.pending.focused
                && ws.pending.focus_mode == super::workspace::FocusMode::Tiling
                && ws.pending.active_column == Some(id)
        };
        let column = &mut self.columns[id];
        column.pending.workspace = Some(workspace);
        column.pending.output = output;
        column.pending.focused = focused;
        let children = column.pending.children.clone();
        for child in children {
            self.window_reconcile_tiling(child, id);
        }
    }

    pub fn column_reconcile_detached(&mut self, id: ColumnId) {
        let column = &mut self.columns[id];
        column.pending.workspace = None;
        column.pending.output = None;
        column.pending.focused = false;
        let children = column.pending.children.clone();
        for child in children {
            self.window_reconcile_tiling(child, id);
        }
    }

    pub fn column_find_child(&self, id: ColumnId, mut test: impl FnMut(WindowId) -> bool) -> Option<WindowId> {
        self.columns[id].pending.children.iter().copied().find(|&w| test(w))
    }

    pub fn column_get_first_child(&self, id: ColumnId) -> Option<WindowId> {
        self.columns[id].pending.children.first().copied()
    }

    pub fn column_get_last_child(&self, id: ColumnId) -> Option<WindowId> {
        self.columns[id].pending.children.last().copied()
    }

    /// Inserts `window` at index `i`. The window must be detached
    /// (not already tiled or floating) beforehand.
    pub fn column_insert_child(&mut self, column: ColumnId, window: WindowId, index: usize) {
        debug_assert!(
            self.windows[window].pending.parent.is_none() && self.windows[window].pending.workspace.is_none(),
            "windows must be detached before they can be added to a column"
        );
        debug_assert!(index <= self.columns[column].pending.children.len());
        if self.columns[column].pending.children.is_empty() {
            self.columns[column].pending.active_child = Some(window);
        }
        self.columns[column].pending.children.insert(index, window);
        self.window_reconcile_tiling(window, column);
        self.window_handle_fullscreen_reparent(window);
    }

    /// Inserts `active` next to `fixed` (after if `after`, else before).
    /// `fixed` must already be a child of some column.
    pub fn column_add_sibling(&mut self, fixed: WindowId, active: WindowId, after: bool) {
        let Some(column) = self.windows[fixed].pending.parent else {
            debug_assert!(false, "expected fixed window to be tiled");
            return;
        };
        let index = self.columns[column]
            .pending
            .children
            .iter()
            .position(|&w| w == fixed)
            .expect("fixed window missing from its own column");
        let insert_at = if after { index + 1 } else { index };
        self.columns[column].pending.children.insert(insert_at, active);
        self.window_reconcile_tiling(fixed, column);
        self.window_reconcile_tiling(active, column);
        self.window_handle_fullscreen_reparent(active);
    }

    pub fn column_add_child(&mut self, column: ColumnId, window: WindowId) {
        if self.columns[column].pending.children.is_empty() {
            self.columns[column].pending.active_child = Some(window);
        }
        self.columns[column].pending.children.push(window);
        self.window_reconcile_tiling(window, column);
        self.window_handle_fullscreen_reparent(window);
        self.window_set_dirty(window);
        self.column_set_dirty(column);
    }

    /// Removes `window` from `column`. If it was the active child, the
    /// previous sibling becomes active (or the new first child, or none).
    pub fn column_remove_child(&mut self, column: ColumnId, window: WindowId) {
        let children = &mut self.columns[column].pending.children;
        let Some(index) = children.iter().position(|&w| w == window) else {
            return;
        };
        children.remove(index);

        if self.columns[column].pending.active_child == Some(window) {
            let children = &self.columns[column].pending.children;
            let new_active = if !children.is_empty() {
                Some(children[index.saturating_sub(1).min(children.len() - 1)])
            } else {
                None
            };
            self.columns[column].pending.active_child = new_active;
            if let Some(new_active) = new_active {
                self.window_reconcile_tiling(new_active, column);
            }
        }
        self.window_reconcile_detached(window);
    }

    pub fn column_set_active_child(&mut self, column: ColumnId, window: WindowId) {
        debug_assert_eq!(self.windows[window].pending.parent, Some(column));
        let previous = self.columns[column].pending.active_child;
        if previous == Some(window) {
            return;
        }
        self.columns[column].pending.active_child = Some(window);
        self.window_reconcile_tiling(window, column);
        self.window_set_dirty(window);
        if let Some(previous) = previous {
            self.window_reconcile_tiling(previous, column);
            self.window_set_dirty(previous);
        }
        self.column_set_dirty(column);
    }

    pub fn column_get_box(&self, id: ColumnId) -> Rectangle<i32, Logical> {
        let c = &self.columns[id].pending;
        Rectangle::new((c.x, c.y).into(), (c.width, c.height).into())
    }

    pub fn column_set_resizing(&mut self, id: ColumnId, resizing: bool) {
        let children = self.columns[id].pending.children.clone();
        for child in children {
            self.window_set_resizing(child, resizing);
        }
    }

    pub fn column_has_urgent_child(&self, id: ColumnId) -> bool {
        self.columns[id]
            .pending
            .children
            .iter()
            .any(|&w| self.windows[w].view.is_urgent())
    }

    /// Shows a drag-insertion preview anchored at `anchor_y` (output-local
    /// layout coordinates) with the given baseline offset, and immediately
    /// re-arranges so `preview_target`/`preview_box` reflect it. Called by
    /// the move op on every motion event while hovering this column.
    pub fn column_show_preview(&mut self, id: ColumnId, anchor_y: f64, baseline: f64) {
        {
            let c = &mut self.columns[id].pending;
            c.show_preview = true;
            c.preview_anchor_y = anchor_y;
            c.preview_baseline = baseline;
        }
        self.column_arrange(id);
    }

    /// Hides the preview, if one is shown, and re-arranges without it.
    pub fn column_hide_preview(&mut self, id: ColumnId) {
        if !self.columns[id].pending.show_preview {
            return;
        }
        self.columns[id].pending.show_preview = false;
        self.column_arrange(id);
    }

    fn column_arrange_split(&mut self, id: ColumnId) {
        let children = self.columns[id].pending.children.clone();
        let box_ = self.column_get_box(id);
        if children.is_empty() {
            let c = &mut self.columns[id].pending;
            c.preview_target = None;
            c.preview_box = box_;
            self.column_set_dirty(id);
            return;
        }

        let show_preview = self.columns[id].pending.show_preview;
        let preview_height_fraction = self.columns[id].pending.preview_height_fraction;
        let preview_titlebar_height = self.config.layout.preview_titlebar_height as f64;

        let mut visible_height_fraction = 0.0;
        let mut available_content_height = box_.size.h as f64;
        for &child in &children {
            visible_height_fraction += self.windows[child].pending.height_fraction;
            available_content_height -= self.windows[child].pending.titlebar_height as f64;
        }
        if show_preview {
            visible_height_fraction += preview_height_fraction;
            available_content_height -= preview_titlebar_height;
        }

        let mut y_offset = 0.0_f64;
        let preview_baseline = (self.columns[id].pending.preview_baseline * preview_height_fraction).round();
        let anchor_y = self.columns[id].pending.preview_anchor_y;
        let column_y = box_.loc.y as f64;

        let mut next_baseline_delta = (column_y + preview_baseline - anchor_y).abs();
        let mut preview_inserted = false;

        for (i, &child) in children.iter().enumerate() {
            let titlebar_height = self.windows[child].pending.titlebar_height as f64;
            let height_fraction = self.windows[child].pending.height_fraction;
            let mut window_height = titlebar_height
                + available_content_height * height_fraction / visible_height_fraction;
            self.windows[child].pending.shaded = false;

            let baseline_delta = next_baseline_delta;
            next_baseline_delta = (column_y + (y_offset + window_height).round() + preview_baseline - anchor_y).abs();

            if show_preview && !preview_inserted && next_baseline_delta > baseline_delta {
                let preview_height =
                    preview_titlebar_height + available_content_height * preview_height_fraction / visible_height_fraction;
                let preview_target = if i > 0 { Some(children[i - 1]) } else { None };
                let c = &mut self.columns[id].pending;
                c.preview_target = preview_target;
                c.preview_box = Rectangle::new(
                    (box_.loc.x, box_.loc.y + y_offset.round() as i32).into(),
                    (box_.size.w, preview_height.round() as i32).into(),
                );
                preview_inserted = true;
                y_offset += preview_height;
            }

            self.windows[child].pending.x = box_.loc.x;
            self.windows[child].pending.y = box_.loc.y + y_offset.round() as i32;
            self.windows[child].pending.width = box_.size.w;
            window_height = window_height.round();
            self.windows[child].pending.height = window_height as i32;

            y_offset += window_height;
        }

        if show_preview && !preview_inserted {
            let preview_height =
                preview_titlebar_height + available_content_height * preview_height_fraction / visible_height_fraction;
            let c = &mut self.columns[id].pending;
            c.preview_target = children.last().copied();
            c.preview_box = Rectangle::new(
                (box_.loc.x, box_.loc.y + y_offset.round() as i32).into(),
                (box_.size.w, preview_height.round() as i32).into(),
            );
        }
    }

    fn column_arrange_stacked(&mut self, id: ColumnId) {
        let children = self.columns[id].pending.children.clone();
        let box_ = self.column_get_box(id);
        if children.is_empty() {
            let c = &mut self.columns[id].pending;
            c.preview_target = None;
            c.preview_box = box_;
            self.column_set_dirty(id);
            return;
        }

        let show_preview = self.columns[id].pending.show_preview;
        let active_child = if show_preview {
            None
        } else {
            self.columns[id].pending.active_child
        };

        let preview_titlebar_height = self.config.layout.preview_titlebar_height as f64;
        let mut available_content_height = box_.size.h as f64;
        for &child in &children {
            available_content_height -= self.windows[child].pending.titlebar_height as f64;
        }
        if show_preview {
            available_content_height -= preview_titlebar_height;
        }

        let mut y_offset = 0.0_f64;
        let preview_height_fraction = self.columns[id].pending.preview_height_fraction;
        let preview_baseline = (self.columns[id].pending.preview_baseline * preview_height_fraction).round();
        let anchor_y = self.columns[id].pending.preview_anchor_y;
        let column_y = box_.loc.y as f64;

        let mut next_baseline_delta = (column_y + preview_baseline - anchor_y).abs();
        let mut preview_inserted = false;

        for (i, &child) in children.iter().enumerate() {
            let titlebar_height = self.windows[child].pending.titlebar_height as f64;
            let mut window_height = titlebar_height;
            if Some(child) != active_child {
                self.windows[child].pending.shaded = true;
            } else {
                window_height += available_content_height;
                self.windows[child].pending.shaded = false;
            }

            let baseline_delta = next_baseline_delta;
            next_baseline_delta = (column_y + (y_offset + window_height).round() + preview_baseline - anchor_y).abs();

            if show_preview && !preview_inserted && next_baseline_delta > baseline_delta {
                let preview_height = preview_titlebar_height + available_content_height;
                let preview_target = if i > 0 { Some(children[i - 1]) } else { None };
                let c = &mut self.columns[id].pending;
                c.preview_target = preview_target;
                c.preview_box = Rectangle::new(
                    (box_.loc.x, box_.loc.y + y_offset.round() as i32).into(),
                    (box_.size.w, preview_height.round() as i32).into(),
                );
                preview_inserted = true;
                y_offset += preview_height;
            }

            self.windows[child].pending.x = box_.loc.x;
            self.windows[child].pending.y = box_.loc.y + y_offset.round() as i32;
            self.windows[child].pending.width = box_.size.w;
            window_height = window_height.round();
            self.windows[child].pending.height = window_height as i32;

            y_offset += window_height;
        }

        if show_preview && !preview_inserted {
            let preview_height = preview_titlebar_height + available_content_height;
            let c = &mut self.columns[id].pending;
            c.preview_target = children.last().copied();
            c.preview_box = Rectangle::new(
                (box_.loc.x, box_.loc.y + y_offset.round() as i32).into(),
                (box_.size.w, preview_height.round() as i32).into(),
            );
        }
    }

    /// Lays out every child according to the column's layout mode, then
    /// arranges each child in turn.
    pub fn column_arrange(&mut self, id: ColumnId) {
        match self.columns[id].pending.layout {
            ColumnLayout::Split => self.column_arrange_split(id),
            ColumnLayout::Stacked => self.column_arrange_stacked(id),
        }
        let children = self.columns[id].pending.children.clone();
        for child in children {
            self.window_arrange(child);
        }
        self.column_set_dirty(id);
    }

    pub(crate) fn column_handle_commit(&mut self, id: ColumnId) {
        self.columns[id].committed = self.columns[id].pending.clone();
    }

    pub(crate) fn column_handle_apply(&mut self, id: ColumnId) {
        let dead = self.columns[id].committed.dead;
        if dead {
            self.transaction.schedule_after_apply(id.into());
        }
        self.columns[id].current = self.columns[id].committed.clone();
    }

    pub(crate) fn column_handle_after_apply(&mut self, id: ColumnId) {
        debug_assert!(self.columns[id].current.dead);
        self.columns[id].destroy_signal.emit(&id);
        self.columns.remove(id);
        self.push_event(TreeEvent::SceneChanged);
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
    fn insert_first_child_becomes_active() {
        let mut tree = make_tree();
        let column = tree.column_create();
        let window = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        tree.column_insert_child(column, window, 0);
        assert_eq!(tree.columns[column].pending.active_child, Some(window));
    }

    #[test]
    fn remove_active_child_falls_back_to_previous_sibling() {
        let mut tree = make_tree();
        let column = tree.column_create();
        let a = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        let b = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        let c = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        tree.column_insert_child(column, a, 0);
        tree.column_insert_child(column, b, 1);
        tree.column_insert_child(column, c, 2);
        tree.column_set_active_child(column, c);
        tree.column_remove_child(column, c);
        assert_eq!(tree.columns[column].pending.active_child, Some(b));
    }

    #[test]
    fn stacked_arrange_shades_non_active_children() {
        let mut tree = make_tree();
        let column = tree.column_create();
        tree.columns[column].pending.width = 400;
        tree.columns[column].pending.height = 400;
        let a = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        let b = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        tree.column_insert_child(column, a, 0);
        tree.column_insert_child(column, b, 1);
        tree.column_arrange(column);
        assert!(!tree.windows[a].pending.shaded);
        assert!(tree.windows[b].pending.shaded);
    }
}
