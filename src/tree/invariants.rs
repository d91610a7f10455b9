//! Debug-only consistency checks run once per round, in `before_commit`.
//!
//! Per the error handling design (`spec.md` §7), invariant violations are
//! fatal assertions, never recovered `Result`s, and the checks themselves
//! only run in debug builds so a release compositor never pays for them.
//! Every assertion here corresponds to a quantified invariant in `spec.md`
//! §3/§8.

use super::Tree;

impl Tree {
    /// Walks every live entity and asserts the structural invariants that
    /// must hold on `pending` state at the start of a round, before any
    /// entity's `commit` handler runs. A no-op in release builds.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_check_invariants(&self) {
        for (ws_id, ws) in self.workspaces.iter() {
            if ws.pending.dead {
                continue;
            }
            // workspace.active_column, when set, is one of workspace.columns.
            if let Some(active) = ws.pending.active_column {
                debug_assert!(
                    ws.pending.tiling.contains(&active),
                    "workspace {ws_id:?}'s active_column is not in its own tiling list"
                );
            }
            // Every column claims this workspace as its own, and every
            // tiling window under it mirrors workspace/output (fullscreen
            // windows are exempt: they keep their own output across moves).
            for &column_id in &ws.pending.tiling {
                let column = &self.columns[column_id];
                debug_assert_eq!(
                    column.pending.workspace,
                    Some(ws_id),
                    "column {column_id:?} does not point back at workspace {ws_id:?} that owns it"
                );
                if let Some(active_child) = column.pending.active_child {
                    debug_assert!(
                        column.pending.children.contains(&active_child),
                        "column {column_id:?}'s active_child is not among its own children"
                    );
                }
                for &window_id in &column.pending.children {
                    let window = &self.windows[window_id];
                    debug_assert_eq!(
                        window.pending.workspace,
                        Some(ws_id),
                        "tiling window {window_id:?} does not mirror its column's workspace"
                    );
                    if !window.pending.fullscreen {
                        debug_assert_eq!(
                            window.pending.output, column.pending.output,
                            "non-fullscreen tiling window {window_id:?} does not mirror its column's output"
                        );
                    }
                }
            }
            // Every floating window is detached and points back at this
            // workspace.
            for &window_id in &ws.pending.floating {
                let window = &self.windows[window_id];
                debug_assert!(
                    window.pending.parent.is_none(),
                    "floating window {window_id:?} still has a column parent"
                );
                debug_assert_eq!(
                    window.pending.workspace,
                    Some(ws_id),
                    "floating window {window_id:?} does not mirror its workspace"
                );
            }
            if let Some(active_floating) = ws.pending.active_floating {
                debug_assert!(
                    ws.pending.floating.contains(&active_floating),
                    "workspace {ws_id:?}'s active_floating is not in its own floating list"
                );
            }
            if ws.pending.focused {
                debug_assert_eq!(
                    self.root.active_workspace,
                    Some(ws_id),
                    "workspace {ws_id:?} thinks it's focused but isn't root's active workspace"
                );
            }
        }

        // No column appears under more than one workspace; no window
        // appears under more than one column's children or workspace's
        // floating list.
        let mut seen_columns = std::collections::HashSet::new();
        let mut seen_windows = std::collections::HashSet::new();
        for ws in self.workspaces.values() {
            if ws.pending.dead {
                continue;
            }
            for &column_id in &ws.pending.tiling {
                debug_assert!(
                    seen_columns.insert(column_id),
                    "column {column_id:?} appears in more than one workspace's tiling list"
                );
            }
            for &window_id in &ws.pending.floating {
                debug_assert!(
                    seen_windows.insert(window_id),
                    "window {window_id:?} appears in more than one workspace's floating list"
                );
            }
        }
        for column in self.columns.values() {
            if column.pending.dead {
                continue;
            }
            for &window_id in &column.pending.children {
                debug_assert!(
                    seen_windows.insert(window_id),
                    "window {window_id:?} appears in more than one column's children"
                );
            }
        }

        // focused_window / focused_layer / focused_unmanaged are mutually
        // exclusive layers of focus.
        if self.root.focused_surface {
            debug_assert!(
                !self.root.focused_layer,
                "focused_surface and focused_layer must not both be set"
            );
        }
    }

    #[cfg(not(debug_assertions))]
    pub(crate) fn debug_check_invariants(&self) {}
}

#[cfg(test)]
mod tests {
    use smithay::utils::Rectangle;

    use super::super::test_support::{MockFactory, MockView};
    use super::*;

    fn make_tree() -> Tree {
        Tree::new(std::rc::Rc::new(tessera_config::Config::default()))
    }

    #[test]
    fn fresh_tree_satisfies_invariants() {
        let tree = make_tree();
        tree.debug_check_invariants();
    }

    #[test]
    fn populated_tree_satisfies_invariants() {
        let mut tree = make_tree();
        let output = tree.output_create("dummy", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let ws = tree.workspace_create("1");
        tree.workspace_reconcile(ws, Some(output), true);
        tree.root_set_active_workspace(Some(ws));

        let column = tree.column_create();
        tree.workspace_insert_tiling(ws, column, 0);
        let tiled = tree.window_create(Box::new(MockView::xdg(400, 400)), &mut MockFactory);
        tree.column_insert_child(column, tiled, 0);

        let floating = tree.window_create(Box::new(MockView::xdg(200, 200)), &mut MockFactory);
        tree.workspace_add_floating(ws, floating);

        tree.debug_check_invariants();
    }

    #[test]
    fn fullscreen_tiling_window_may_diverge_from_its_column_output() {
        let mut tree = make_tree();
        let a = tree.output_create("a", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let b = tree.output_create("b", Rectangle::new((1000, 0).into(), (1000, 800).into()));
        let ws = tree.workspace_create("1");
        tree.workspace_reconcile(ws, Some(a), true);

        let column = tree.column_create();
        tree.workspace_insert_tiling(ws, column, 0);
        let window = tree.window_create(Box::new(MockView::xdg(400, 400)), &mut MockFactory);
        tree.column_insert_child(column, window, 0);
        tree.window_set_fullscreen(window, true);
        // Diverge the window's output from its column's while fullscreen,
        // exactly as a fullscreen window retains its output across an
        // evacuation that moves its column elsewhere.
        tree.windows[window].pending.output = Some(b);

        tree.debug_check_invariants();
    }
}
