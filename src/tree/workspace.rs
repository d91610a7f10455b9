//! A workspace: a named set of tiling columns (normalized to sum to the
//! output's width) plus a stack of floating windows, shown on at most one
//! output at a time.

use smithay::utils::{Logical, Point, Rectangle};

use super::ids::{ColumnId, OutputId, WindowId, WorkspaceId};
use super::{Tree, TreeEvent};
use crate::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Tiling,
    Floating,
}

impl Default for FocusMode {
    fn default() -> Self {
        FocusMode::Tiling
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkspaceState {
    pub name: String,
    pub output: Option<OutputId>,
    pub tiling: Vec<ColumnId>,
    pub floating: Vec<WindowId>,
    pub active_column: Option<ColumnId>,
    pub active_floating: Option<WindowId>,
    pub focus_mode: FocusMode,
    /// Whether this workspace is the one currently shown on its output.
    pub focused: bool,
    pub dead: bool,
}

pub struct Workspace {
    pub id: WorkspaceId,
    dirty: bool,
    pub begin_destroy_signal: Signal<WorkspaceId>,
    pub destroy_signal: Signal<WorkspaceId>,
    pub pending: WorkspaceState,
    pub committed: WorkspaceState,
    pub current: WorkspaceState,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("id", &self.id)
            .field("name", &self.pending.name)
            .finish()
    }
}

impl Tree {
    pub fn workspace_create(&mut self, name: impl Into<String>) -> WorkspaceId {
        self.workspaces.insert_with_key(|id| Workspace {
            id,
            dirty: false,
            begin_destroy_signal: Signal::new(),
            destroy_signal: Signal::new(),
            pending: WorkspaceState {
                name: name.into(),
                ..Default::default()
            },
            committed: WorkspaceState::default(),
            current: WorkspaceState::default(),
        })
    }

    pub fn workspace_is_alive(&self, id: WorkspaceId) -> bool {
        self.workspaces.get(id).is_some_and(|w| !w.pending.dead)
    }

    pub fn workspace_is_visible(&self, id: WorkspaceId) -> bool {
        self.workspaces[id].pending.focused
    }

    fn workspace_detach(&mut self, id: WorkspaceId) {
        self.workspaces[id].pending.output = None;
    }

    fn workspace_begin_destroy(&mut self, id: WorkspaceId) {
        let Some(workspace) = self.workspaces.get_mut(id) else {
            return;
        };
        if workspace.pending.dead {
            return;
        }
        workspace.pending.dead = true;
        self.workspace_detach(id);
        self.workspaces[id].begin_destroy_signal.emit(&id);
        self.workspace_set_dirty(id);
    }

    /// Destroys the workspace once it has no columns and no floating
    /// windows left. Named workspaces created explicitly by the user are
    /// exempt in the source; this crate has no such distinction and always
    /// considers destruction, leaving policy (e.g. "keep at least one
    /// workspace per output") to the caller.
    pub fn workspace_consider_destroy(&mut self, id: WorkspaceId) {
        let ws = &self.workspaces[id].pending;
        if !ws.tiling.is_empty() || !ws.floating.is_empty() {
            return;
        }
        self.workspace_begin_destroy(id);
    }

    pub fn workspace_set_dirty(&mut self, id: WorkspaceId) {
        let Some(workspace) = self.workspaces.get_mut(id) else {
            return;
        };
        if workspace.dirty {
            return;
        }
        workspace.dirty = true;
        self.transaction.register(id.into());
        self.transaction.ensure_queued();

        let tiling = self.workspaces[id].pending.tiling.clone();
        for column in tiling {
            self.column_set_dirty(column);
        }
        let floating = self.workspaces[id].pending.floating.clone();
        for window in floating {
            self.window_set_dirty(window);
        }
    }

    pub(crate) fn workspace_clear_dirty(&mut self, id: WorkspaceId) {
        if let Some(workspace) = self.workspaces.get_mut(id) {
            workspace.dirty = false;
        }
    }

    pub fn workspace_detect_urgent(&self, id: WorkspaceId) -> bool {
        let ws = &self.workspaces[id].pending;
        ws.tiling.iter().any(|&c| self.column_has_urgent_child(c))
            || ws.floating.iter().any(|&w| self.windows[w].view.is_urgent())
    }

    pub fn workspace_reconcile(&mut self, id: WorkspaceId, output: Option<OutputId>, focused: bool) {
        {
            let ws = &mut self.workspaces[id].pending;
            ws.output = output;
            ws.focused = focused;
        }
        let tiling = self.workspaces[id].pending.tiling.clone();
        for column in tiling {
            self.column_reconcile(column, id, output);
        }
        let floating = self.workspaces[id].pending.floating.clone();
        for window in floating {
            self.window_reconcile_floating(window, id);
        }
    }

    pub fn workspace_reconcile_detached(&mut self, id: WorkspaceId) {
        {
            let ws = &mut self.workspaces[id].pending;
            ws.output = None;
            ws.focused = false;
        }
        let tiling = self.workspaces[id].pending.tiling.clone();
        for column in tiling {
            self.column_reconcile_detached(column);
        }
    }

    pub fn workspace_active_output(&self, id: WorkspaceId) -> Option<OutputId> {
        self.workspaces[id].pending.output
    }

    pub fn workspace_add_floating(&mut self, workspace: WorkspaceId, window: WindowId) {
        debug_assert!(self.windows[window].pending.parent.is_none());
        debug_assert!(self.windows[window].pending.workspace.is_none());
        let first = self.workspaces[workspace].pending.floating.is_empty();
        self.workspaces[workspace].pending.floating.push(window);
        if first {
            self.workspaces[workspace].pending.active_floating = Some(window);
        }
        self.window_reconcile_floating(window, workspace);
        self.window_set_dirty(window);
        self.workspace_set_dirty(workspace);
    }

    pub fn workspace_remove_floating(&mut self, workspace: WorkspaceId, window: WindowId) {
        let floating = &mut self.workspaces[workspace].pending.floating;
        let Some(index) = floating.iter().position(|&w| w == window) else {
            return;
        };
        floating.remove(index);
        if self.workspaces[workspace].pending.active_floating == Some(window) {
            let floating = &self.workspaces[workspace].pending.floating;
            self.workspaces[workspace].pending.active_floating =
                floating.get(index.saturating_sub(1).min(floating.len().saturating_sub(1))).copied();
        }
        self.window_reconcile_detached(window);
        self.workspace_consider_destroy(workspace);
    }

    pub fn workspace_raise_floating(&mut self, workspace: WorkspaceId, window: WindowId) {
        let floating = &mut self.workspaces[workspace].pending.floating;
        let Some(index) = floating.iter().position(|&w| w == window) else {
            return;
        };
        floating.remove(index);
        floating.push(window);
        self.window_set_dirty(window);
        self.workspace_set_dirty(workspace);
    }

    pub fn workspace_insert_tiling(&mut self, workspace: WorkspaceId, column: ColumnId, index: usize) {
        let output = self.workspaces[workspace].pending.output;
        let first = self.workspaces[workspace].pending.tiling.is_empty();
        self.workspaces[workspace].pending.tiling.insert(index, column);
        if first {
            self.workspaces[workspace].pending.active_column = Some(column);
        }
        self.column_reconcile(column, workspace, output);
        self.workspace_arrange(workspace);
    }

    pub fn workspace_remove_column(&mut self, workspace: WorkspaceId, column: ColumnId) {
        let tiling = &mut self.workspaces[workspace].pending.tiling;
        let Some(index) = tiling.iter().position(|&c| c == column) else {
            return;
        };
        tiling.remove(index);
        if self.workspaces[workspace].pending.active_column == Some(column) {
            let tiling = &self.workspaces[workspace].pending.tiling;
            self.workspaces[workspace].pending.active_column =
                tiling.get(index.saturating_sub(1).min(tiling.len().saturating_sub(1))).copied();
        }
        self.column_reconcile_detached(column);
        self.workspace_arrange(workspace);
        self.workspace_consider_destroy(workspace);
    }

    pub fn workspace_num_tiling_views(&self, id: WorkspaceId) -> usize {
        self.workspaces[id]
            .pending
            .tiling
            .iter()
            .map(|&c| self.columns[c].pending.children.len())
            .sum()
    }

    pub fn workspace_get_active_tiling_window(&self, id: WorkspaceId) -> Option<WindowId> {
        let column = self.workspaces[id].pending.active_column?;
        self.columns[column].pending.active_child
    }

    pub fn workspace_get_active_floating_window(&self, id: WorkspaceId) -> Option<WindowId> {
        self.workspaces[id].pending.active_floating
    }

    pub fn workspace_get_active_window(&self, id: WorkspaceId) -> Option<WindowId> {
        match self.workspaces[id].pending.focus_mode {
            FocusMode::Tiling => self
                .workspace_get_active_tiling_window(id)
                .or_else(|| self.workspace_get_active_floating_window(id)),
            FocusMode::Floating => self
                .workspace_get_active_floating_window(id)
                .or_else(|| self.workspace_get_active_tiling_window(id)),
        }
    }

    pub fn workspace_set_active_window(&mut self, id: WorkspaceId, window: WindowId) {
        let Some(window_rec) = self.windows.get(window) else {
            return;
        };
        if let Some(column) = window_rec.pending.parent {
            self.column_set_active_child(column, window);
            self.workspaces[id].pending.active_column = Some(column);
            self.workspaces[id].pending.focus_mode = FocusMode::Tiling;
        } else if window_rec.pending.workspace == Some(id) {
            self.workspace_raise_floating(id, window);
            self.workspaces[id].pending.active_floating = Some(window);
            self.workspaces[id].pending.focus_mode = FocusMode::Floating;
        }
        self.workspace_set_dirty(id);
    }

    pub fn workspace_get_fullscreen_window(&self, id: WorkspaceId) -> Option<WindowId> {
        let ws = &self.workspaces[id].pending;
        ws.tiling
            .iter()
            .flat_map(|&c| self.columns[c].pending.children.iter().copied())
            .chain(ws.floating.iter().copied())
            .find(|&w| self.windows[w].pending.fullscreen)
    }

    fn workspace_arrange_floating(&mut self, id: WorkspaceId) {
        let floating = self.workspaces[id].pending.floating.clone();
        for window in floating {
            self.window_arrange(window);
        }
    }

    /// Normalizes `width_fraction` across every column on the workspace's
    /// current output so they sum to 1.0, giving newly inserted columns a
    /// provisional share derived from the already-sized columns, then
    /// positions each column left to right and arranges it.
    fn workspace_arrange_tiling(&mut self, id: WorkspaceId) {
        let Some(output) = self.workspaces[id].pending.output else {
            return;
        };
        let usable = self.outputs[output].pending.usable_area;
        let gap = self.config.layout.column_gap;

        let columns = self.workspaces[id].pending.tiling.clone();
        if columns.is_empty() {
            return;
        }

        let total_columns = columns.len();
        let mut current_width_fraction = 0.0;
        let mut new_columns = 0;
        for &column in &columns {
            let fraction = self.columns[column].pending.width_fraction;
            if fraction > 0.0 {
                current_width_fraction += fraction;
            } else {
                new_columns += 1;
            }
        }

        let provisional_fraction = if total_columns != new_columns && current_width_fraction > 0.0 {
            current_width_fraction / (total_columns - new_columns) as f64
        } else if current_width_fraction <= 0.0 {
            1.0
        } else {
            current_width_fraction
        };

        let mut total_fraction = 0.0;
        for &column in &columns {
            let fraction = &mut self.columns[column].pending.width_fraction;
            if *fraction <= 0.0 {
                *fraction = provisional_fraction;
            }
            total_fraction += *fraction;
        }

        let available_width = usable.size.w as f64 - gap as f64 * (total_columns.saturating_sub(1)) as f64;
        let mut x_offset = usable.loc.x as f64;
        for &column in &columns {
            let fraction = self.columns[column].pending.width_fraction / total_fraction;
            let width = (available_width * fraction).round();
            let c = &mut self.columns[column].pending;
            c.x = x_offset.round() as i32;
            c.y = usable.loc.y;
            c.width = width as i32;
            c.height = usable.size.h;
            x_offset += width + gap as f64;
            self.column_arrange(column);
        }
    }

    pub fn workspace_arrange(&mut self, id: WorkspaceId) {
        self.workspace_arrange_tiling(id);
        self.workspace_arrange_floating(id);
        self.workspace_set_dirty(id);
    }

    pub fn workspace_center_floating(&mut self, id: WorkspaceId, window: WindowId, at: Point<i32, Logical>) {
        debug_assert_eq!(self.windows[window].pending.workspace, Some(id));
        self.window_floating_move_to(window, at.x, at.y);
    }

    pub(crate) fn workspace_handle_commit(&mut self, id: WorkspaceId) {
        self.workspaces[id].committed = self.workspaces[id].pending.clone();
    }

    pub(crate) fn workspace_handle_apply(&mut self, id: WorkspaceId) {
        let dead = self.workspaces[id].committed.dead;
        if dead {
            self.transaction.schedule_after_apply(id.into());
        }
        self.workspaces[id].current = self.workspaces[id].committed.clone();
    }

    pub(crate) fn workspace_handle_after_apply(&mut self, id: WorkspaceId) {
        debug_assert!(self.workspaces[id].current.dead);
        self.workspaces[id].destroy_signal.emit(&id);
        self.workspaces.remove(id);
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
    fn new_column_gets_full_fraction_when_alone() {
        let mut tree = make_tree();
        let output = tree.output_create("dummy", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let ws = tree.workspace_create("1");
        tree.workspace_reconcile(ws, Some(output), true);
        let column = tree.column_create();
        tree.workspace_insert_tiling(ws, column, 0);
        assert_eq!(tree.columns[column].pending.width_fraction, 1.0);
        assert_eq!(tree.columns[column].pending.width, 1000);
    }

    #[test]
    fn provisional_fraction_is_mean_of_existing_columns() {
        let mut tree = make_tree();
        let output = tree.output_create("dummy", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let ws = tree.workspace_create("1");
        tree.workspace_reconcile(ws, Some(output), true);
        let a = tree.column_create();
        tree.workspace_insert_tiling(ws, a, 0);
        let b = tree.column_create();
        tree.workspace_insert_tiling(ws, b, 1);
        assert!((tree.columns[a].pending.width_fraction - 0.5).abs() < 1e-9);
        assert!((tree.columns[b].pending.width_fraction - 0.5).abs() < 1e-9);
    }

    #[test]
    fn remove_floating_reassigns_active_to_previous() {
        let mut tree = make_tree();
        let output = tree.output_create("dummy", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let ws = tree.workspace_create("1");
        tree.workspace_reconcile(ws, Some(output), true);
        let a = tree.window_create(Box::new(MockView::xdg(10, 10)), &mut MockFactory);
        let b = tree.window_create(Box::new(MockView::xdg(10, 10)), &mut MockFactory);
        tree.workspace_add_floating(ws, a);
        tree.workspace_add_floating(ws, b);
        tree.workspace_remove_floating(ws, b);
        assert_eq!(tree.workspaces[ws].pending.active_floating, Some(a));
    }
}
