//! Generational-index identifiers for every arena-stored tree entity.
//!
//! Replaces the source's `container_of`/intrusive-pointer idiom: a handle is
//! a small `Copy` key into a [`slotmap::SlotMap`], not a raw pointer. Looking
//! up a handle whose slot was freed and reused returns `None` instead of
//! dangling, which is exactly the "destroyed referent -> no-op" policy of
//! the error handling design.

use slotmap::new_key_type;

new_key_type! {
    pub struct WindowId;
    pub struct ColumnId;
    pub struct WorkspaceId;
    pub struct OutputId;
}

/// Identifies any tree entity uniformly. Used as the transaction manager's
/// dirty-list element type, and to report cross-cutting events (window
/// destruction) to collaborators (seats) that live outside the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityHandle {
    Window(WindowId),
    Column(ColumnId),
    Workspace(WorkspaceId),
    Output(OutputId),
    Root,
}

impl From<WindowId> for EntityHandle {
    fn from(id: WindowId) -> Self {
        EntityHandle::Window(id)
    }
}

impl From<ColumnId> for EntityHandle {
    fn from(id: ColumnId) -> Self {
        EntityHandle::Column(id)
    }
}

impl From<WorkspaceId> for EntityHandle {
    fn from(id: WorkspaceId) -> Self {
        EntityHandle::Workspace(id)
    }
}

impl From<OutputId> for EntityHandle {
    fn from(id: OutputId) -> Self {
        EntityHandle::Output(id)
    }
}
