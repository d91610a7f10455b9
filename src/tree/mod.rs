//! The tree model: the hierarchy Root -> Workspace -> (Output, Column,
//! Window) plus floating windows, and the single transaction manager that
//! coordinates their double-buffered `pending -> committed -> current`
//! lifecycle.
//!
//! Every entity kind lives in its own [`slotmap::SlotMap`] arena on [`Tree`].
//! Cross-entity operations (e.g. inserting a window into a column) are
//! implemented as `impl Tree` methods split across this module's siblings,
//! one file per entity kind, mirroring how the source splits `column.c`,
//! `workspace.c`, `window.c`, `output.c`, `root.c`.

use std::rc::Rc;

use slotmap::SlotMap;

pub mod column;
pub mod ids;
mod invariants;
pub mod output;
pub mod root;
pub mod scene;
pub mod theme;
pub mod transaction;
pub mod view;
pub mod window;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;

pub use column::{Column, ColumnLayout, ColumnState};
pub use ids::{ColumnId, EntityHandle, OutputId, WindowId, WorkspaceId};
pub use output::Output;
pub use root::{FocusTarget, Root};
pub use transaction::TransactionManager;
pub use view::{View, ViewEvent, ViewKind};
pub use window::{Window, WindowState};
pub use workspace::{FocusMode, Workspace};

/// Events raised by a transaction round that a collaborator living outside
/// the arena (a `Seat`) must react to. Drained by `State::dispatch` after
/// every `Tree::flush_transactions` call.
#[derive(Debug)]
pub enum TreeEvent {
    /// Raised synchronously inside `window_begin_destroy`, before the
    /// transaction round that will actually free the window. Seats must
    /// stop referencing the window (`SeatOp::unref`) right away, since a
    /// pointer/resize grab outliving `begin_destroy` would observe a
    /// half-dead entity during the same round.
    WindowBeginDestroy(WindowId),
    /// Raised at `after_apply` once the window's record is actually freed.
    WindowDestroyed(WindowId),
    FocusChanged {
        old: FocusTarget,
        new: FocusTarget,
    },
    SceneChanged,
}

/// Owns every tree entity and the transaction manager coordinating them.
pub struct Tree {
    pub windows: SlotMap<WindowId, Window>,
    pub columns: SlotMap<ColumnId, Column>,
    pub workspaces: SlotMap<WorkspaceId, Workspace>,
    pub outputs: SlotMap<OutputId, Output>,
    pub root: Root,
    pub transaction: TransactionManager,
    pub config: Rc<tessera_config::Config>,
    events: Vec<TreeEvent>,
}

impl Tree {
    pub fn new(config: Rc<tessera_config::Config>) -> Self {
        Self {
            windows: SlotMap::with_key(),
            columns: SlotMap::with_key(),
            workspaces: SlotMap::with_key(),
            outputs: SlotMap::with_key(),
            root: Root::new(),
            transaction: TransactionManager::new(),
            config,
            events: Vec::new(),
        }
    }

    pub(crate) fn push_event(&mut self, event: TreeEvent) {
        self.events.push(event);
    }

    /// Drains every event raised since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("windows", &self.windows.len())
            .field("columns", &self.columns.len())
            .field("workspaces", &self.workspaces.len())
            .field("outputs", &self.outputs.len())
            .finish()
    }
}
