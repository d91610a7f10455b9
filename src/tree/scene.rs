//! The `Scene` collaborator: an opaque tree of positioned nodes the core
//! mutates but never renders. Rendering (and the concrete node
//! representation — nineslice images, text, GPU buffers) belongs to the
//! layer above this crate.

use smithay::utils::{Logical, Point, Size};

/// A single positioned node in the scene graph.
pub trait SceneNode: std::fmt::Debug {
    fn set_position(&mut self, position: Point<i32, Logical>);
    fn set_enabled(&mut self, enabled: bool);
    fn set_size(&mut self, size: Size<i32, Logical>);

    /// Reparents `self` under `parent` without changing the on-screen
    /// position it should keep (callers pass position deltas explicitly
    /// when the coordinate space changes between old and new parents).
    fn reparent(&mut self, parent: &dyn SceneNode);
    fn raise_to_top(&mut self);
    fn place_above(&mut self, sibling: &dyn SceneNode);
    fn place_below(&mut self, sibling: &dyn SceneNode);

    /// Detaches and frees this node and its subtree. Idempotent.
    fn destroy(&mut self);
}

/// Constructs the typed leaf nodes a `Window`/`Column`/`Output` needs.
/// Implemented by the rendering layer; the core only ever calls through
/// this trait, never constructs a concrete node type itself.
pub trait SceneFactory {
    fn create_subtree(&mut self) -> Box<dyn SceneNode>;
    fn create_rectangle(&mut self, size: Size<i32, Logical>) -> Box<dyn SceneNode>;
    fn create_nineslice(&mut self, size: Size<i32, Logical>) -> Box<dyn SceneNode>;
    fn create_text(&mut self, text: &str) -> Box<dyn SceneNode>;
}
