//! Interactive resize of a tiling window: dragging a column's left/right
//! border trades `width_fraction` with its horizontal neighbor, dragging a
//! window's top/bottom border (inside a SPLIT column) trades
//! `height_fraction` with its vertical neighbor. The sum of fractions across
//! the affected pair is always preserved, mirroring
//! `workspace_arrange_tiling`'s normalize-to-one invariant.

use smithay::utils::{Logical, Point};
use tessera_config::MouseButton;

use crate::input::seatops::resize_floating::Edge;
use crate::tree::{ColumnId, Tree, WindowId, WorkspaceId};

/// The smallest fraction either side of a resize is allowed to shrink to,
/// keeping a dragged-shut column/window from vanishing entirely.
const MIN_FRACTION: f64 = 0.05;

#[derive(Debug)]
pub struct ResizeTilingOp {
    window: WindowId,
    edge: Edge,
    pub initiating_button: MouseButton,
    start_pointer: Point<f64, Logical>,
    workspace: Option<WorkspaceId>,
    column: Option<ColumnId>,

    neighbor_column: Option<ColumnId>,
    start_width_fraction: f64,
    start_neighbor_width_fraction: f64,
    available_width: f64,

    neighbor_window: Option<WindowId>,
    start_height_fraction: f64,
    start_neighbor_height_fraction: f64,
    available_height: f64,
}

impl ResizeTilingOp {
    pub fn new(window: WindowId, edge: Edge, start_pointer: Point<f64, Logical>, initiating_button: MouseButton) -> Self {
        Self {
            window,
            edge,
            initiating_button,
            start_pointer,
            workspace: None,
            column: None,
            neighbor_column: None,
            start_width_fraction: 0.0,
            start_neighbor_width_fraction: 0.0,
            available_width: 0.0,
            neighbor_window: None,
            start_height_fraction: 0.0,
            start_neighbor_height_fraction: 0.0,
            available_height: 0.0,
        }
    }

    pub fn begin(&mut self, tree: &mut Tree) {
        self.workspace = tree.windows[self.window].pending.workspace;
        self.column = tree.windows[self.window].pending.parent;
        tree.window_set_resizing(self.window, true);

        let Some(column) = self.column else { return };
        let Some(workspace) = self.workspace else { return };

        if self.edge.left || self.edge.right {
            let tiling = tree.workspaces[workspace].pending.tiling.clone();
            let Some(index) = tiling.iter().position(|&c| c == column) else {
                return;
            };
            self.neighbor_column = if self.edge.right {
                tiling.get(index + 1).copied()
            } else {
                index.checked_sub(1).and_then(|i| tiling.get(i).copied())
            };
            if let Some(output) = tree.workspace_active_output(workspace) {
                let usable = tree.output_get_usable_area(output);
                let gap = tree.config.layout.column_gap;
                let total_columns = tiling.len();
                self.available_width =
                    usable.size.w as f64 - gap as f64 * total_columns.saturating_sub(1) as f64;
            }
            self.start_width_fraction = tree.columns[column].pending.width_fraction;
            self.start_neighbor_width_fraction =
                self.neighbor_column.map_or(0.0, |c| tree.columns[c].pending.width_fraction);
        }

        if self.edge.top || self.edge.bottom {
            let children = tree.columns[column].pending.children.clone();
            let Some(index) = children.iter().position(|&w| w == self.window) else {
                return;
            };
            self.neighbor_window = if self.edge.bottom {
                children.get(index + 1).copied()
            } else {
                index.checked_sub(1).and_then(|i| children.get(i).copied())
            };
            self.available_height = tree.columns[column].pending.height as f64;
            self.start_height_fraction = tree.windows[self.window].pending.height_fraction;
            self.start_neighbor_height_fraction =
                self.neighbor_window.map_or(0.0, |w| tree.windows[w].pending.height_fraction);
        }
    }

    pub fn motion(&mut self, tree: &mut Tree, pointer: Point<f64, Logical>) {
        if !tree.window_is_alive(self.window) {
            return;
        }
        let dx = pointer.x - self.start_pointer.x;
        let dy = pointer.y - self.start_pointer.y;

        if let (Some(column), Some(neighbor)) = (self.column, self.neighbor_column) {
            if self.available_width > 0.0 {
                let raw = if self.edge.right { dx } else { -dx };
                let pair = self.start_width_fraction + self.start_neighbor_width_fraction;
                let delta = raw / self.available_width;
                let mut fraction = self.start_width_fraction + delta;
                fraction = fraction.clamp(MIN_FRACTION, (pair - MIN_FRACTION).max(MIN_FRACTION));
                tree.columns[column].pending.width_fraction = fraction;
                tree.columns[neighbor].pending.width_fraction = pair - fraction;
                if let Some(workspace) = self.workspace {
                    tree.workspace_arrange(workspace);
                }
            }
        }

        if let (Some(neighbor), true) = (self.neighbor_window, self.available_height > 0.0) {
            let raw = if self.edge.bottom { dy } else { -dy };
            let pair = self.start_height_fraction + self.start_neighbor_height_fraction;
            let delta = raw / self.available_height;
            let mut fraction = self.start_height_fraction + delta;
            fraction = fraction.clamp(MIN_FRACTION, (pair - MIN_FRACTION).max(MIN_FRACTION));
            tree.windows[self.window].pending.height_fraction = fraction;
            tree.windows[neighbor].pending.height_fraction = pair - fraction;
            if let Some(column) = self.column {
                tree.column_arrange(column);
            }
        }
    }

    pub fn end(&mut self, tree: &mut Tree) {
        if tree.window_is_alive(self.window) {
            tree.window_set_resizing(self.window, false);
        }
    }

    pub fn unref(&mut self, tree: &mut Tree, window: WindowId) -> bool {
        if window == self.window {
            self.end(tree);
            false
        } else if Some(window) == self.neighbor_window {
            self.neighbor_window = None;
            true
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use smithay::utils::Rectangle;
    use tessera_config::MouseButton;

    use super::*;
    use crate::tree::test_support::{MockFactory, MockView};
    use crate::tree::ColumnLayout;

    fn make_tree() -> Tree {
        Tree::new(std::rc::Rc::new(tessera_config::Config::default()))
    }

    #[test]
    fn horizontal_resize_trades_width_fraction_with_neighbor() {
        let mut tree = make_tree();
        let output = tree.output_create("dummy", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let workspace = tree.workspace_create("1");
        tree.workspace_reconcile(workspace, Some(output), true);

        let left = tree.column_create();
        let right = tree.column_create();
        tree.workspace_insert_tiling(workspace, left, 0);
        tree.workspace_insert_tiling(workspace, right, 1);
        let left_window = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        let right_window = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        tree.column_insert_child(left, left_window, 0);
        tree.column_insert_child(right, right_window, 0);
        tree.workspace_arrange(workspace);

        let pair = tree.columns[left].pending.width_fraction + tree.columns[right].pending.width_fraction;

        let edge = Edge { left: false, right: true, top: false, bottom: true };
        let mut op = ResizeTilingOp::new(left_window, edge, (0.0, 0.0).into(), MouseButton::Left);
        op.begin(&mut tree);
        op.motion(&mut tree, (100.0, 0.0).into());

        let new_pair = tree.columns[left].pending.width_fraction + tree.columns[right].pending.width_fraction;
        assert!((new_pair - pair).abs() < 1e-9);
        assert!(tree.columns[left].pending.width_fraction > 0.5);
    }

    #[test]
    fn vertical_resize_trades_height_fraction_within_split_column() {
        let mut tree = make_tree();
        let output = tree.output_create("dummy", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let workspace = tree.workspace_create("1");
        tree.workspace_reconcile(workspace, Some(output), true);

        let column = tree.column_create();
        tree.columns[column].pending.layout = ColumnLayout::Split;
        tree.workspace_insert_tiling(workspace, column, 0);
        let top = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        let bottom = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        tree.column_insert_child(column, top, 0);
        tree.column_insert_child(column, bottom, 1);
        tree.workspace_arrange(workspace);

        let pair = tree.windows[top].pending.height_fraction + tree.windows[bottom].pending.height_fraction;

        let edge = Edge { left: false, right: true, top: false, bottom: true };
        let mut op = ResizeTilingOp::new(top, edge, (0.0, 0.0).into(), MouseButton::Left);
        op.begin(&mut tree);
        op.motion(&mut tree, (0.0, 100.0).into());

        let new_pair = tree.windows[top].pending.height_fraction + tree.windows[bottom].pending.height_fraction;
        assert!((new_pair - pair).abs() < 1e-9);
        assert!(tree.windows[top].pending.height_fraction > 0.5);
    }

    #[test]
    fn resize_clamps_to_minimum_fraction() {
        let mut tree = make_tree();
        let output = tree.output_create("dummy", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let workspace = tree.workspace_create("1");
        tree.workspace_reconcile(workspace, Some(output), true);

        let left = tree.column_create();
        let right = tree.column_create();
        tree.workspace_insert_tiling(workspace, left, 0);
        tree.workspace_insert_tiling(workspace, right, 1);
        let left_window = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        let right_window = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        tree.column_insert_child(left, left_window, 0);
        tree.column_insert_child(right, right_window, 0);
        tree.workspace_arrange(workspace);

        let edge = Edge { left: false, right: true, top: false, bottom: true };
        let mut op = ResizeTilingOp::new(left_window, edge, (0.0, 0.0).into(), MouseButton::Left);
        op.begin(&mut tree);
        op.motion(&mut tree, (-10_000.0, 0.0).into());

        assert!(tree.columns[left].pending.width_fraction >= MIN_FRACTION - 1e-9);
    }
}
