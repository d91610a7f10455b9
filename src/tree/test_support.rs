//! Minimal `View`/`SceneNode`/`SceneFactory` stand-ins shared by this
//! module's unit tests. None of this is wired into a real protocol layer;
//! it exists purely so `Tree`'s own logic can be exercised without one.

use smithay::utils::{Logical, Point, Rectangle, Serial, Size, SERIAL_COUNTER};

use super::scene::{SceneFactory, SceneNode};
use super::view::{View, ViewKind};

#[derive(Debug)]
pub struct MockView {
    kind: ViewKind,
    natural_size: Size<i32, Logical>,
    urgent: bool,
}

impl MockView {
    pub fn xdg(width: i32, height: i32) -> Self {
        Self {
            kind: ViewKind::XdgShell,
            natural_size: (width, height).into(),
            urgent: false,
        }
    }

    pub fn xwayland(width: i32, height: i32) -> Self {
        Self {
            kind: ViewKind::Xwayland,
            natural_size: (width, height).into(),
            urgent: false,
        }
    }
}

impl View for MockView {
    fn kind(&self) -> ViewKind {
        self.kind
    }

    fn natural_size(&self) -> Size<i32, Logical> {
        self.natural_size
    }

    fn configure(&mut self, _geometry: Rectangle<i32, Logical>) -> Serial {
        SERIAL_COUNTER.next_serial()
    }

    fn set_fullscreen(&mut self, _fullscreen: bool) {}
    fn set_tiled(&mut self, _tiled: bool) {}
    fn set_activated(&mut self, _activated: bool) {}
    fn set_resizing(&mut self, _resizing: bool) {}
    fn close(&mut self) {}
    fn freeze_buffer(&mut self) {}
    fn unfreeze_buffer(&mut self) {}
    fn send_frame_done(&mut self) {}
    fn center_surface(&mut self) {}

    fn is_urgent(&self) -> bool {
        self.urgent
    }

    fn clear_urgent(&mut self) {
        self.urgent = false;
    }

    fn is_transient_for(&self, _other: &dyn View) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct MockNode;

impl SceneNode for MockNode {
    fn set_position(&mut self, _position: Point<i32, Logical>) {}
    fn set_enabled(&mut self, _enabled: bool) {}
    fn set_size(&mut self, _size: Size<i32, Logical>) {}
    fn reparent(&mut self, _parent: &dyn SceneNode) {}
    fn raise_to_top(&mut self) {}
    fn place_above(&mut self, _sibling: &dyn SceneNode) {}
    fn place_below(&mut self, _sibling: &dyn SceneNode) {}
    fn destroy(&mut self) {}
}

#[derive(Debug, Default)]
pub struct MockFactory;

impl SceneFactory for MockFactory {
    fn create_subtree(&mut self) -> Box<dyn SceneNode> {
        Box::new(MockNode)
    }

    fn create_rectangle(&mut self, _size: Size<i32, Logical>) -> Box<dyn SceneNode> {
        Box::new(MockNode)
    }

    fn create_nineslice(&mut self, _size: Size<i32, Logical>) -> Box<dyn SceneNode> {
        Box::new(MockNode)
    }

    fn create_text(&mut self, _text: &str) -> Box<dyn SceneNode> {
        Box::new(MockNode)
    }
}
