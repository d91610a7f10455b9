//! A plain button-down on a surface's contents with no binding and no
//! resize/move edge involved: forwards motion and the eventual release to
//! the surface, same as the source's `seatop_begin_down`.

use smithay::utils::{Logical, Point};
use tessera_config::MouseButton;

use crate::input::Seat;
use crate::tree::{Tree, WindowId};

#[derive(Debug)]
pub struct DownOp {
    window: WindowId,
    pub initiating_button: MouseButton,
}

impl DownOp {
    pub fn new(window: WindowId, initiating_button: MouseButton) -> Self {
        Self { window, initiating_button }
    }

    pub fn end(&mut self, _tree: &mut Tree) {}

    pub fn motion(&mut self, seat: &mut Seat, tree: &mut Tree, pointer: Point<f64, Logical>) {
        if !tree.window_is_alive(self.window) {
            return;
        }
        let content = tree.windows[self.window].pending.content_box_f64();
        let surface_local = (pointer.x - content.loc.x, pointer.y - content.loc.y).into();
        seat.handle.pointer_notify_motion(surface_local);
    }

    pub fn unref(&mut self, tree: &mut Tree, window: WindowId) -> bool {
        if window == self.window {
            self.end(tree);
            false
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::input::SeatHandle;
    use crate::tree::test_support::{MockFactory, MockView};

    fn make_tree() -> Tree {
        Tree::new(Rc::new(tessera_config::Config::default()))
    }

    #[derive(Debug)]
    struct RecordingHandle {
        last_motion: Rc<RefCell<Option<Point<f64, Logical>>>>,
    }

    impl SeatHandle for RecordingHandle {
        fn pointer_notify_enter(&mut self, _surface_local: Point<f64, Logical>) {}
        fn pointer_notify_motion(&mut self, surface_local: Point<f64, Logical>) {
            *self.last_motion.borrow_mut() = Some(surface_local);
        }
        fn pointer_notify_button(&mut self, _button: MouseButton, _pressed: bool) {}
        fn pointer_notify_axis(&mut self, _horizontal: f64, _vertical: f64) {}
        fn pointer_clear_focus(&mut self) {}
        fn keyboard_notify_enter(&mut self, _window: WindowId) {}
        fn keyboard_clear_focus(&mut self) {}
    }

    #[test]
    fn motion_forwards_surface_local_coordinates() {
        let mut tree = make_tree();
        let window = tree.window_create(Box::new(MockView::xdg(200, 150)), &mut MockFactory);
        let workspace = tree.workspace_create("1");
        tree.workspace_add_floating(workspace, window);
        tree.window_floating_move_to(window, 10, 20);

        let last_motion = Rc::new(RefCell::new(None));
        let mut seat = crate::input::Seat::new(
            Box::new(RecordingHandle { last_motion: last_motion.clone() }),
            Rc::new(tessera_config::Config::default()),
        );
        let mut op = DownOp::new(window, MouseButton::Left);
        op.motion(&mut seat, &mut tree, (50.0, 70.0).into());

        let content = tree.windows[window].pending.content_box_f64();
        let expected_x = 50.0 - content.loc.x;
        let expected_y = 70.0 - content.loc.y;
        let got = last_motion.borrow().expect("motion forwarded");
        assert!((got.x - expected_x).abs() < 1e-9);
        assert!((got.y - expected_y).abs() < 1e-9);
    }
}
