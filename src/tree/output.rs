//! A physical (or virtual) display: owns geometry, the usable area left
//! after layer-shell reservations, and the workspaces currently mapped to
//! it.

use smithay::utils::{Logical, Rectangle};

use super::ids::{OutputId, WindowId, WorkspaceId};
use super::{Tree, TreeEvent};
use crate::signal::Signal;

#[derive(Debug, Clone, Default)]
pub struct OutputState {
    pub name: String,
    pub geometry: Rectangle<i32, Logical>,
    /// `geometry` minus layer-shell exclusive zones.
    pub usable_area: Rectangle<i32, Logical>,
    pub enabled: bool,
    pub dead: bool,
    /// Fullscreen windows bound to this output, oldest first. The top (last
    /// element) is the one actually shown; a window lower in the stack
    /// belongs to a workspace that isn't currently focused on this output.
    pub fullscreen_windows: Vec<WindowId>,
}

pub struct Output {
    pub id: OutputId,
    dirty: bool,
    pub begin_destroy_signal: Signal<OutputId>,
    pub destroy_signal: Signal<OutputId>,
    pub disable_signal: Signal<OutputId>,
    pub pending: OutputState,
    pub committed: OutputState,
    pub current: OutputState,
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output")
            .field("id", &self.id)
            .field("name", &self.pending.name)
            .field("geometry", &self.pending.geometry)
            .finish()
    }
}

/// Collaborator trait implemented by the wire-protocol layer's output
/// object, letting the core push geometry changes without depending on a
/// concrete `wlr_output`.
pub trait OutputHandle: std::fmt::Debug {
    fn name(&self) -> &str;
    fn natural_geometry(&self) -> Rectangle<i32, Logical>;
}

impl Tree {
    pub fn output_create(&mut self, name: impl Into<String>, geometry: Rectangle<i32, Logical>) -> OutputId {
        let id = self.outputs.insert_with_key(|id| Output {
            id,
            dirty: false,
            begin_destroy_signal: Signal::new(),
            destroy_signal: Signal::new(),
            disable_signal: Signal::new(),
            pending: OutputState {
                name: name.into(),
                geometry,
                usable_area: geometry,
                enabled: false,
                ..Default::default()
            },
            committed: OutputState::default(),
            current: OutputState::default(),
        });
        self.output_enable(id);
        id
    }

    pub fn output_is_alive(&self, id: OutputId) -> bool {
        self.outputs.get(id).is_some_and(|o| !o.pending.dead)
    }

    pub fn output_set_dirty(&mut self, id: OutputId) {
        let Some(output) = self.outputs.get_mut(id) else {
            return;
        };
        if output.dirty {
            return;
        }
        output.dirty = true;
        self.transaction.register(id.into());
        self.transaction.ensure_queued();
    }

    pub(crate) fn output_clear_dirty(&mut self, id: OutputId) {
        if let Some(output) = self.outputs.get_mut(id) {
            output.dirty = false;
        }
    }

    pub fn output_enable(&mut self, id: OutputId) {
        debug_assert!(!self.outputs[id].pending.enabled);
        self.outputs[id].pending.enabled = true;
        self.root_reconcile();
        self.output_set_dirty(id);
    }

    /// First live enabled output other than `id`, in arena iteration order.
    fn output_pick_evacuation_target(&self, id: OutputId) -> Option<OutputId> {
        self.outputs
            .iter()
            .find(|(other, o)| *other != id && o.pending.enabled && !o.pending.dead)
            .map(|(other, _)| other)
    }

    /// Reassigns every column and floating window on `id` to the first
    /// other live output, clearing fullscreen along the way (matching the
    /// source, which never preserves fullscreen across an output move). If
    /// no other output is live, windows keep `output = None` until one
    /// reappears; arrangement of those workspaces becomes a no-op until
    /// then.
    fn output_evacuate(&mut self, id: OutputId) {
        let target = self.output_pick_evacuation_target(id);
        let workspaces: Vec<WorkspaceId> = self.workspaces.keys().collect();
        for workspace in workspaces {
            if self.workspaces[workspace].pending.output != Some(id) {
                continue;
            }
            let tiling = self.workspaces[workspace].pending.tiling.clone();
            for column in tiling {
                if self.columns[column].pending.output != Some(id) {
                    continue;
                }
                self.columns[column].pending.output = target;
                let children = self.columns[column].pending.children.clone();
                for window in children {
                    self.windows[window].pending.fullscreen = false;
                    self.windows[window].pending.output = target;
                }
            }
            let floating = self.workspaces[workspace].pending.floating.clone();
            for window in floating {
                if self.windows[window].pending.output != Some(id) {
                    continue;
                }
                self.windows[window].pending.fullscreen = false;
                self.windows[window].pending.output = target;
                if target.is_some() {
                    self.window_floating_move_to_center(window);
                }
            }
            self.workspaces[workspace].pending.output = target;
            self.workspace_arrange(workspace);
        }
        self.outputs[id].pending.fullscreen_windows.clear();
    }

    pub fn output_disable(&mut self, id: OutputId) {
        debug_assert!(self.outputs[id].pending.enabled);
        self.outputs[id].disable_signal.emit(&id);
        self.output_evacuate(id);
        self.outputs[id].pending.enabled = false;
        self.root_reconcile();
        self.output_set_dirty(id);
    }

    pub fn output_begin_destroy(&mut self, id: OutputId) {
        debug_assert!(!self.outputs[id].pending.enabled);
        let Some(output) = self.outputs.get_mut(id) else {
            return;
        };
        if output.pending.dead {
            return;
        }
        output.pending.dead = true;
        self.outputs[id].begin_destroy_signal.emit(&id);
        self.output_set_dirty(id);
    }

    /// Recomputes `fullscreen_windows` from the active workspace shown on
    /// this output: the focused workspace's fullscreen window (if any) is
    /// moved to the top of the stack, so it becomes the visible one,
    /// matching `workspace_get_fullscreen_window_for_output`'s "top of
    /// stack is what's shown" contract. Entries belonging to other,
    /// currently unfocused workspaces on this output are left in place
    /// beneath it.
    pub fn output_reconcile(&mut self, id: OutputId) {
        let workspace = self.workspaces.iter().find_map(|(ws_id, ws)| {
            (ws.pending.output == Some(id) && ws.pending.focused).then_some(ws_id)
        });
        let fullscreen = workspace.and_then(|ws| self.workspace_get_fullscreen_window(ws));

        let stack = &mut self.outputs[id].pending.fullscreen_windows;
        stack.retain(|&w| Some(w) != fullscreen);
        if let Some(window) = fullscreen {
            stack.push(window);
        }
    }

    /// The fullscreen window currently shown on this output, if any: the top
    /// of `fullscreen_windows`.
    pub fn output_get_fullscreen_window(&self, id: OutputId) -> Option<WindowId> {
        self.outputs[id].pending.fullscreen_windows.last().copied()
    }

    pub fn output_get_box(&self, id: OutputId) -> Rectangle<i32, Logical> {
        self.outputs[id].pending.geometry
    }

    pub fn output_get_usable_area(&self, id: OutputId) -> Rectangle<i32, Logical> {
        self.outputs[id].pending.usable_area
    }

    pub fn output_set_usable_area(&mut self, id: OutputId, usable: Rectangle<i32, Logical>) {
        self.outputs[id].pending.usable_area = usable;
        self.output_set_dirty(id);
    }

    pub(crate) fn output_handle_commit(&mut self, id: OutputId) {
        self.outputs[id].committed = self.outputs[id].pending.clone();
    }

    pub(crate) fn output_handle_apply(&mut self, id: OutputId) {
        let dead = self.outputs[id].committed.dead;
        if dead {
            self.transaction.schedule_after_apply(id.into());
        }
        self.outputs[id].current = self.outputs[id].committed.clone();
    }

    pub(crate) fn output_handle_after_apply(&mut self, id: OutputId) {
        debug_assert!(self.outputs[id].current.dead);
        debug_assert!(!self.outputs[id].current.enabled);
        self.outputs[id].destroy_signal.emit(&id);
        self.outputs.remove(id);
        self.push_event(TreeEvent::SceneChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tree() -> Tree {
        Tree::new(std::rc::Rc::new(tessera_config::Config::default()))
    }

    #[test]
    fn evacuation_falls_back_to_first_remaining_live_output() {
        let mut tree = make_tree();
        let a = tree.output_create("a", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let b = tree.output_create("b", Rectangle::new((1000, 0).into(), (1000, 800).into()));
        let ws = tree.workspace_create("1");
        tree.workspace_reconcile(ws, Some(a), true);
        let column = tree.column_create();
        tree.workspace_insert_tiling(ws, column, 0);

        tree.output_disable(a);
        assert_eq!(tree.columns[column].pending.output, Some(b));
    }

    #[test]
    fn evacuation_with_no_other_output_leaves_no_output() {
        let mut tree = make_tree();
        let only = tree.output_create("only", Rectangle::new((0, 0).into(), (1000, 800).into()));
        let ws = tree.workspace_create("1");
        tree.workspace_reconcile(ws, Some(only), true);
        let column = tree.column_create();
        tree.workspace_insert_tiling(ws, column, 0);

        tree.output_disable(only);
        assert_eq!(tree.columns[column].pending.output, None);
    }
}
