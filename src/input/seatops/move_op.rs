//! Interactive window move. Floating windows follow the cursor directly;
//! tiling windows stay put in their source column while a preview tracks
//! the destination column, and the actual reparent happens at release.
//!
//! Grounded in `spec.md` §4.6's Move op description and
//! `original_source/src/input/seatop_default.c`'s `seatop_begin_move_floating`
//! / `seatop_begin_move_tiling`.

use smithay::utils::{Logical, Point};
use tessera_config::MouseButton;

use crate::tree::{ColumnId, Tree, WindowId, WorkspaceId};

#[derive(Debug)]
pub struct MoveOp {
    window: WindowId,
    pub initiating_button: MouseButton,
    start_pointer: Point<f64, Logical>,
    workspace: Option<WorkspaceId>,
    floating: bool,
    /// Cursor position minus the window's outer origin, captured at grab
    /// start; kept fixed so dragging doesn't "snap" the window under the
    /// cursor.
    grab_offset: Point<i32, Logical>,
    source_column: Option<ColumnId>,
    target_column: Option<ColumnId>,
}

impl MoveOp {
    pub fn new(window: WindowId, start_pointer: Point<f64, Logical>, initiating_button: MouseButton) -> Self {
        Self {
            window,
            initiating_button,
            start_pointer,
            workspace: None,
            floating: false,
            grab_offset: (0, 0).into(),
            source_column: None,
            target_column: None,
        }
    }

    pub fn begin(&mut self, tree: &mut Tree) {
        self.workspace = tree.windows[self.window].pending.workspace;
        self.floating = tree.window_is_floating(self.window);
        if self.floating {
            if let Some(box_) = tree.window_get_box(self.window) {
                self.grab_offset = (
                    self.start_pointer.x as i32 - box_.loc.x,
                    self.start_pointer.y as i32 - box_.loc.y,
                )
                    .into();
            }
        } else {
            self.source_column = tree.windows[self.window].pending.parent;
            self.target_column = self.source_column;
        }
        tree.windows[self.window].pending.moving = true;
        tree.window_set_dirty(self.window);
    }

    pub fn motion(&mut self, tree: &mut Tree, pointer: Point<f64, Logical>) {
        if !tree.window_is_alive(self.window) {
            return;
        }

        if self.floating {
            let x = pointer.x as i32 - self.grab_offset.x;
            let y = pointer.y as i32 - self.grab_offset.y;
            tree.window_floating_move_to(self.window, x, y);
            tree.window_arrange(self.window);
            return;
        }

        let Some(workspace) = self.workspace else {
            return;
        };
        let hit = tree.hit_test(workspace, pointer);
        let hovered_column = hit.window.and_then(|w| tree.windows[w].pending.parent);

        if self.target_column != hovered_column {
            if let Some(previous) = self.target_column {
                if tree.column_is_alive(previous) {
                    tree.column_hide_preview(previous);
                }
            }
            self.target_column = hovered_column;
        }

        if let Some(column) = hovered_column {
            tree.column_show_preview(column, pointer.y, 0.0);
        }
    }

    /// Performs the attach this op was tracking. Floating windows simply
    /// stay where the last motion left them; tiling windows detach from
    /// their source column and insert into the previewed destination slot,
    /// or into a brand-new column when dropped onto a workspace gap.
    pub fn end(&mut self, tree: &mut Tree) {
        if !tree.window_is_alive(self.window) {
            return;
        }
        tree.windows[self.window].pending.moving = false;
        tree.window_set_dirty(self.window);

        if self.floating {
            return;
        }
        let Some(workspace) = self.workspace else {
            return;
        };

        match self.target_column {
            Some(target) if tree.column_is_alive(target) => {
                let preview_target = tree.columns[target].pending.preview_target;
                tree.column_hide_preview(target);
                let index = match preview_target {
                    Some(after) => tree.columns[target]
                        .pending
                        .children
                        .iter()
                        .position(|&w| w == after)
                        .map_or(0, |i| i + 1),
                    None => 0,
                };

                if Some(target) == self.source_column {
                    // Dropped back into the same column: just reorder.
                    tree.column_remove_child(target, self.window);
                    let index = index.min(tree.columns[target].pending.children.len());
                    tree.column_insert_child(target, self.window, index);
                } else {
                    if let Some(source) = self.source_column {
                        tree.column_remove_child(source, self.window);
                        tree.column_consider_destroy(source);
                    }
                    let index = index.min(tree.columns[target].pending.children.len());
                    tree.column_insert_child(target, self.window, index);
                }
                tree.workspace_arrange(workspace);
            }
            _ => {
                // Dropped on a workspace gap (or the previewed column died
                // mid-drag): spin up a fresh column at the end of the row.
                if let Some(source) = self.source_column {
                    tree.column_remove_child(source, self.window);
                    tree.column_consider_destroy(source);
                }
                let new_column = tree.column_create();
                tree.column_insert_child(new_column, self.window, 0);
                let at = tree.workspaces[workspace].pending.tiling.len();
                tree.workspace_insert_tiling(workspace, new_column, at);
            }
        }
    }

    pub fn unref(&mut self, tree: &mut Tree, window: WindowId) -> bool {
        if window == self.window {
            // The dragged window itself died: there is nothing left to
            // attach anywhere, just drop the grab.
            if let Some(target) = self.target_column {
                if tree.column_is_alive(target) {
                    tree.column_hide_preview(target);
                }
            }
            false
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

    fn make_tree() -> Tree {
        Tree::new(std::rc::Rc::new(tessera_config::Config::default()))
    }

    #[test]
    fn floating_move_tracks_pointer_offset() {
        let mut tree = make_tree();
        let window = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        let workspace = tree.workspace_create("1");
        tree.workspace_add_floating(workspace, window);
        tree.window_floating_move_to(window, 50, 50);

        let mut op = MoveOp::new(window, (60.0, 60.0).into(), MouseButton::Left);
        op.begin(&mut tree);
        op.motion(&mut tree, (160.0, 160.0).into());

        assert_eq!(tree.windows[window].pending.x, 150);
        assert_eq!(tree.windows[window].pending.y, 150);
    }

    #[test]
    fn tiling_move_to_empty_gap_creates_new_column() {
        let mut tree = make_tree();
        let output = tree.output_create("dummy", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let workspace = tree.workspace_create("1");
        tree.workspace_reconcile(workspace, Some(output), true);
        let column = tree.column_create();
        tree.workspace_insert_tiling(workspace, column, 0);
        let window = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        tree.column_insert_child(column, window, 0);
        tree.workspace_arrange(workspace);

        let mut op = MoveOp::new(window, (0.0, 0.0).into(), MouseButton::Left);
        op.begin(&mut tree);
        // Drag out over the workspace gap so no column is hovered; end()
        // must then fall back to creating a fresh column rather than
        // reusing the (now emptied, dead) source column.
        op.motion(&mut tree, (-50.0, -50.0).into());
        op.end(&mut tree);

        assert_eq!(tree.workspaces[workspace].pending.tiling.len(), 1);
        let new_column = tree.workspaces[workspace].pending.tiling[0];
        assert_ne!(new_column, column);
        assert_eq!(tree.columns[new_column].pending.children, vec![window]);
    }
}
