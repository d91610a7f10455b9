//! Interactive resize of a floating window: the grabbed edges stay fixed to
//! the pointer while the opposite edges stay put.

use smithay::utils::{Logical, Point};
use tessera_config::MouseButton;

use crate::tree::{Tree, WindowId};

/// Which edges of the window's outer box are being dragged. Derived once at
/// grab start from the cursor's quadrant relative to the window's center
/// (see `DefaultOp::edge_for_point`) and held fixed for the grab's duration.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

#[derive(Debug)]
pub struct ResizeFloatingOp {
    window: WindowId,
    edge: Edge,
    pub initiating_button: MouseButton,
    start_pointer: Point<f64, Logical>,
    start_geometry: smithay::utils::Rectangle<i32, Logical>,
}

impl ResizeFloatingOp {
    pub fn new(
        window: WindowId,
        edge: Edge,
        start_pointer: Point<f64, Logical>,
        initiating_button: MouseButton,
    ) -> Self {
        Self {
            window,
            edge,
            initiating_button,
            start_pointer,
            start_geometry: smithay::utils::Rectangle::default(),
        }
    }

    pub fn begin(&mut self, tree: &mut Tree) {
        if let Some(geometry) = tree.window_get_box(self.window) {
            self.start_geometry = geometry;
        }
        tree.window_set_resizing(self.window, true);
    }

    pub fn motion(&mut self, tree: &mut Tree, pointer: Point<f64, Logical>) {
        if !tree.window_is_alive(self.window) {
            return;
        }
        let dx = (pointer.x - self.start_pointer.x).round() as i32;
        let dy = (pointer.y - self.start_pointer.y).round() as i32;
        let g = self.start_geometry;

        let (mut x, mut width) = (g.loc.x, g.size.w);
        if self.edge.left {
            x += dx;
            width -= dx;
        } else if self.edge.right {
            width += dx;
        }
        let (mut y, mut height) = (g.loc.y, g.size.h);
        if self.edge.top {
            y += dy;
            height -= dy;
        } else if self.edge.bottom {
            height += dy;
        }

        let (width, height) = tree.floating_calculate_constraints(width, height);
        if self.edge.left {
            x = g.loc.x + g.size.w - width;
        }
        if self.edge.top {
            y = g.loc.y + g.size.h - height;
        }

        tree.window_floating_move_to(self.window, x, y);
        {
            let window = &mut tree.windows[self.window];
            window.pending.width = width;
            window.pending.height = height;
        }
        tree.window_arrange(self.window);
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
        } else {
            true
        }
    }
}
