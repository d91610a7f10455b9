//! The root singleton: owns the list of workspaces and outputs, tracks
//! which window/layer/surface currently has keyboard focus, and runs the
//! focus-commit algorithm once per transaction round.

use std::time::Duration;

use super::ids::{OutputId, WindowId, WorkspaceId};
use super::{Tree, TreeEvent};
use crate::signal::Signal;

/// Whatever currently holds keyboard focus, in priority order (checked by
/// `root_get_focused_window`): an unmanaged surface beats a keyboard-
/// interactive layer-shell surface beats a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    None,
    Window(WindowId),
    /// A keyboard-interactive layer-shell surface; opaque to the tree, so
    /// only its presence (not identity) matters for focus-commit purposes.
    Layer,
    /// An unmanaged (override-redirect / popup-grab) surface outside the
    /// tree entirely.
    UnmanagedSurface,
}

impl Default for FocusTarget {
    fn default() -> Self {
        FocusTarget::None
    }
}

pub struct Root {
    pub active_workspace: Option<WorkspaceId>,
    pub active_output: Option<OutputId>,
    pub focused_layer: bool,
    pub focused_surface: bool,
    focused_window: Option<WindowId>,
    focused_workspace: Option<WorkspaceId>,
    /// Windows whose urgency hint should clear after `urgent_timeout`
    /// elapses without being serviced by a real event loop timer; `Tree` has
    /// no timer of its own, so `State` polls this queue and calls
    /// `root_service_urgent_timeouts` once the deadline passes.
    urgent_deadlines: Vec<(WindowId, Duration)>,
    pub focus_changed_signal: Signal<(FocusTarget, FocusTarget)>,
    pub scene_changed_signal: Signal<()>,
}

impl std::fmt::Debug for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Root")
            .field("active_workspace", &self.active_workspace)
            .field("active_output", &self.active_output)
            .finish()
    }
}

impl Root {
    pub fn new() -> Self {
        Self {
            active_workspace: None,
            active_output: None,
            focused_layer: false,
            focused_surface: false,
            focused_window: None,
            focused_workspace: None,
            urgent_deadlines: Vec::new(),
            focus_changed_signal: Signal::new(),
            scene_changed_signal: Signal::new(),
        }
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn root_add_workspace(&mut self, id: WorkspaceId) {
        if self.root.active_workspace.is_none() {
            self.root_set_active_workspace(Some(id));
        }
    }

    pub fn root_remove_workspace(&mut self, id: WorkspaceId) {
        if self.root.active_workspace != Some(id) {
            return;
        }
        let next = self
            .workspaces
            .keys()
            .find(|&ws| ws != id && self.workspaces[ws].pending.output.is_some());
        self.root_set_active_workspace(next);
    }

    pub fn root_set_active_workspace(&mut self, id: Option<WorkspaceId>) {
        self.root.active_workspace = id;
        if let Some(id) = id {
            if let Some(output) = self.workspace_active_output(id) {
                self.root.active_output = Some(output);
            }
        }
    }

    pub fn root_get_active_workspace(&self) -> Option<WorkspaceId> {
        self.root.active_workspace
    }

    pub fn root_set_active_output(&mut self, id: Option<OutputId>) {
        self.root.active_output = id;
    }

    pub fn root_get_active_output(&self) -> Option<OutputId> {
        self.root.active_output
    }

    pub fn root_set_focused_window(&mut self, id: WindowId) {
        let Some(workspace) = self.windows[id].pending.workspace else {
            debug_assert!(false, "expected window to have a workspace");
            return;
        };
        self.root.focused_layer = false;
        self.root.focused_surface = false;
        self.root_set_active_workspace(Some(workspace));
        self.workspace_set_active_window(workspace, id);
    }

    pub fn root_get_active_window(&self) -> Option<WindowId> {
        let workspace = self.root.active_workspace?;
        self.workspace_get_active_window(workspace)
    }

    /// `None` whenever a keyboard-interactive layer surface holds focus,
    /// matching the priority rule that a layer surface always wins over the
    /// active window.
    pub fn root_get_focused_window(&self) -> Option<WindowId> {
        if self.root.focused_layer {
            return None;
        }
        self.root_get_active_window()
    }

    pub fn root_set_focused_layer(&mut self, focused: bool) {
        if focused {
            self.root.focused_surface = false;
        }
        self.root.focused_layer = focused;
    }

    /// Setting an unmanaged surface as focused clears any window focus
    /// within the active workspace, matching the source's
    /// `root_set_focused_surface`.
    pub fn root_set_focused_surface(&mut self, focused: bool) {
        if focused {
            self.root.focused_layer = false;
            if let Some(workspace) = self.root.active_workspace {
                if let Some(window) = self.workspace_get_active_window(workspace) {
                    self.window_set_dirty(window);
                }
            }
        }
        self.root.focused_surface = focused;
    }

    pub fn root_focus_target(&self) -> FocusTarget {
        if self.root.focused_surface {
            FocusTarget::UnmanagedSurface
        } else if self.root.focused_layer {
            FocusTarget::Layer
        } else if let Some(window) = self.root_get_active_window() {
            FocusTarget::Window(window)
        } else {
            FocusTarget::None
        }
    }

    pub(crate) fn root_reconcile(&mut self) {
        for output in self.outputs.keys().collect::<Vec<_>>() {
            self.output_reconcile(output);
        }
    }

    /// Run once per transaction round, before `commit`: diffs the focus
    /// target against the last-committed one and reacts to the transition
    /// (deactivating the old view, activating the new one, starting or
    /// clearing the urgency timer). A no-op when nothing changed.
    ///
    /// `now` is the caller's monotonic clock reading, used to schedule
    /// urgency-timeout deadlines without this module depending on a timer
    /// source itself.
    pub fn root_commit_focus(&mut self, now: Duration) {
        let old_window = self.root.focused_window;
        let new_window = self.root_get_focused_window();
        let old_workspace = self.root.focused_workspace;
        let new_workspace = self.root_get_active_workspace();

        if old_window == new_window && old_workspace == new_workspace {
            return;
        }

        if let Some(old) = old_window {
            if Some(old) != new_window && self.windows.contains_key(old) {
                self.windows[old].view.set_activated(false);
                self.window_set_dirty(old);
                if let Some(column) = self.windows[old].pending.parent {
                    self.column_set_dirty(column);
                }
            }
        }

        if let Some(new) = new_window {
            if Some(new) != old_window {
                self.windows[new].view.set_activated(true);

                if self.windows[new].view.is_urgent() {
                    let timeout = self.config.input.urgent_timeout;
                    let crosses_workspace = old_workspace.is_some() && old_workspace != new_workspace;
                    if crosses_workspace && timeout > Duration::ZERO {
                        self.root.urgent_deadlines.push((new, now + timeout));
                    } else {
                        self.windows[new].view.clear_urgent();
                    }
                }

                self.window_set_dirty(new);
                if let Some(column) = self.windows[new].pending.parent {
                    self.column_set_dirty(column);
                }
            }
        }

        let old_target = self.root_focus_target_from(old_window, old_workspace);
        self.root.focused_window = new_window;
        self.root.focused_workspace = new_workspace;
        let new_target = self.root_focus_target();
        self.root.focus_changed_signal.emit(&(old_target, new_target));
        self.push_event(TreeEvent::FocusChanged { old: old_target, new: new_target });
    }

    fn root_focus_target_from(&self, window: Option<WindowId>, _workspace: Option<WorkspaceId>) -> FocusTarget {
        match window {
            Some(w) => FocusTarget::Window(w),
            None => FocusTarget::None,
        }
    }

    /// Clears urgency on every window whose deadline has passed. Called by
    /// `State::dispatch` once per loop iteration.
    pub fn root_service_urgent_timeouts(&mut self, now: Duration) {
        let due: Vec<WindowId> = self
            .root
            .urgent_deadlines
            .iter()
            .filter(|(_, deadline)| *deadline <= now)
            .map(|(w, _)| *w)
            .collect();
        self.root.urgent_deadlines.retain(|(_, deadline)| *deadline > now);
        for window in due {
            if self.windows.contains_key(window) {
                self.windows[window].view.clear_urgent();
                self.window_set_dirty(window);
            }
        }
    }
}
