//! Per-seat input state: a pluggable [`SeatOp`] plus the collaborator that
//! actually delivers events to Wayland clients.
//!
//! Mirrors `original_source/src/input/seat.c` and `seatop_default.c`'s
//! vtable-of-callbacks design, expressed as a tagged enum with a shared
//! `end` finalizer instead of a `struct hayward_seatop_impl` function table.

pub mod seatops;

use std::rc::Rc;

use smithay::utils::{Logical, Point};
use tessera_config::{Modifiers, MouseButton, Region};

use crate::tree::{Tree, WindowId, WorkspaceId};
use seatops::default_op::DefaultOp;
use seatops::down_op::DownOp;
use seatops::move_op::MoveOp;
use seatops::resize_floating::ResizeFloatingOp;
use seatops::resize_tiling::ResizeTilingOp;

/// The wire-protocol collaborator a `Seat` drives. Implemented by the layer
/// above this crate; the core never touches a real `wlr_seat`.
pub trait SeatHandle: std::fmt::Debug {
    fn pointer_notify_enter(&mut self, surface_local: Point<f64, Logical>);
    fn pointer_notify_motion(&mut self, surface_local: Point<f64, Logical>);
    fn pointer_notify_button(&mut self, button: MouseButton, pressed: bool);
    fn pointer_notify_axis(&mut self, horizontal: f64, vertical: f64);
    fn pointer_clear_focus(&mut self);
    fn keyboard_notify_enter(&mut self, window: WindowId);
    fn keyboard_clear_focus(&mut self);
}

/// The pluggable operation a seat's pointer is currently running. Each
/// variant owns exactly the state it needs; switching variants always goes
/// through [`Seat::begin_op`], which calls the outgoing op's `end` first,
/// matching the "one op active at a time" invariant from `seat_set_seatop`.
#[derive(Debug)]
pub enum SeatOp {
    Default(DefaultOp),
    Move(MoveOp),
    ResizeTiling(ResizeTilingOp),
    ResizeFloating(ResizeFloatingOp),
    Down(DownOp),
}

impl SeatOp {
    fn begin(&mut self, tree: &mut Tree) {
        match self {
            SeatOp::Default(_) => {}
            SeatOp::Move(op) => op.begin(tree),
            SeatOp::ResizeTiling(op) => op.begin(tree),
            SeatOp::ResizeFloating(op) => op.begin(tree),
            SeatOp::Down(_) => {}
        }
    }

    fn end(&mut self, tree: &mut Tree) {
        match self {
            SeatOp::Default(op) => op.end(tree),
            SeatOp::Move(op) => op.end(tree),
            SeatOp::ResizeTiling(op) => op.end(tree),
            SeatOp::ResizeFloating(op) => op.end(tree),
            SeatOp::Down(op) => op.end(tree),
        }
    }

    /// Whether the referenced window was this op's subject; if so the op
    /// must abandon it immediately. Returns whether the op is still valid
    /// after the unref (a `Default`/`Down` op with no window reference is
    /// always valid).
    fn unref(&mut self, tree: &mut Tree, window: WindowId) -> bool {
        match self {
            SeatOp::Default(_) => true,
            SeatOp::Move(op) => op.unref(tree, window),
            SeatOp::ResizeTiling(op) => op.unref(tree, window),
            SeatOp::ResizeFloating(op) => op.unref(tree, window),
            SeatOp::Down(op) => op.unref(tree, window),
        }
    }

    fn allow_set_cursor(&self) -> bool {
        matches!(self, SeatOp::Default(_))
    }

    /// Re-derives this op's state at the seat's current pointer location
    /// without any new input having arrived — used after something in the
    /// tree shifted under a motionless cursor (a column re-arranged, a
    /// window closed). `Default`/`Down` hold no position-derived state of
    /// their own, so they have nothing to rebase.
    fn rebase(&mut self, tree: &mut Tree, pointer: Point<f64, Logical>) {
        match self {
            SeatOp::Default(_) | SeatOp::Down(_) => {}
            SeatOp::Move(op) => op.motion(tree, pointer),
            SeatOp::ResizeTiling(op) => op.motion(tree, pointer),
            SeatOp::ResizeFloating(op) => op.motion(tree, pointer),
        }
    }
}

pub struct Seat {
    pub handle: Box<dyn SeatHandle>,
    pub op: SeatOp,
    pub pointer_location: Point<f64, Logical>,
    pub pressed_modifiers: Modifiers,
    config: Rc<tessera_config::Config>,
}

impl std::fmt::Debug for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seat")
            .field("op", &self.op)
            .field("pointer_location", &self.pointer_location)
            .finish()
    }
}

impl Seat {
    pub fn new(handle: Box<dyn SeatHandle>, config: Rc<tessera_config::Config>) -> Self {
        Self {
            handle,
            op: SeatOp::Default(DefaultOp::default()),
            pointer_location: (0.0, 0.0).into(),
            pressed_modifiers: Modifiers::default(),
            config,
        }
    }

    /// Ends the current op and installs `op` in its place. Reentrant calls
    /// (an op trying to begin another op mid-callback) are a programmer
    /// error; the source forbids them by convention and so do we.
    pub fn begin_op(&mut self, tree: &mut Tree, mut op: SeatOp) {
        self.op.end(tree);
        op.begin(tree);
        self.op = op;
    }

    pub fn begin_default(&mut self, tree: &mut Tree) {
        self.begin_op(tree, SeatOp::Default(DefaultOp::default()));
    }

    /// Called by `State` when `tree` raises `WindowBeginDestroy(window)`:
    /// every seat must stop referencing the window in the same round it
    /// started dying.
    pub fn unref(&mut self, tree: &mut Tree, window: WindowId) {
        if !self.op.unref(tree, window) {
            self.begin_default(tree);
        }
    }

    pub fn allow_set_cursor(&self) -> bool {
        self.op.allow_set_cursor()
    }

    pub fn config(&self) -> &tessera_config::Config {
        &self.config
    }

    /// Swaps in a freshly reloaded config snapshot. Called by `State` for
    /// every live seat in the same round it updates `Tree::config`.
    pub fn set_config(&mut self, config: Rc<tessera_config::Config>) {
        self.config = config;
    }

    /// Dispatches a button event to whichever op is active. The default op
    /// decides what to begin; every other op only cares whether this is the
    /// release of the button that started it, in which case it ends and
    /// control reverts to `Default`.
    ///
    /// Non-default ops are taken out of `self.op` via `mem::replace` for the
    /// duration of the call: their `motion`/`end` methods need `&mut Tree`
    /// at the same time the op itself is mutated, which a held
    /// `&mut self.op` borrow would otherwise conflict with a simultaneous
    /// `&mut self` (needed for `self.handle`/`self.begin_op`).
    pub fn button(&mut self, tree: &mut Tree, workspace: WorkspaceId, button: MouseButton, pressed: bool) {
        if matches!(self.op, SeatOp::Default(_)) {
            DefaultOp::button(self, tree, workspace, button, pressed);
            return;
        }

        let mut op = std::mem::replace(&mut self.op, SeatOp::Default(DefaultOp::default()));
        let releases_grab = !pressed
            && match &op {
                SeatOp::Move(o) => button == o.initiating_button,
                SeatOp::ResizeTiling(o) => button == o.initiating_button,
                SeatOp::ResizeFloating(o) => button == o.initiating_button,
                SeatOp::Down(o) => button == o.initiating_button,
                SeatOp::Default(_) => unreachable!(),
            };

        if releases_grab {
            op.end(tree);
            self.handle.pointer_notify_button(button, false);
        } else {
            if matches!(op, SeatOp::Down(_)) {
                self.handle.pointer_notify_button(button, pressed);
            }
            self.op = op;
        }
    }

    pub fn pointer_motion(&mut self, tree: &mut Tree, workspace: WorkspaceId, pointer: Point<f64, Logical>) {
        self.pointer_location = pointer;
        if matches!(self.op, SeatOp::Default(_)) {
            DefaultOp::pointer_motion(self, tree, workspace);
            return;
        }

        let mut op = std::mem::replace(&mut self.op, SeatOp::Default(DefaultOp::default()));
        match &mut op {
            SeatOp::Move(o) => o.motion(tree, pointer),
            SeatOp::ResizeTiling(o) => o.motion(tree, pointer),
            SeatOp::ResizeFloating(o) => o.motion(tree, pointer),
            SeatOp::Down(o) => o.motion(self, tree, pointer),
            SeatOp::Default(_) => unreachable!(),
        }
        self.op = op;
    }

    pub fn pointer_axis(&mut self, tree: &mut Tree, workspace: WorkspaceId, horizontal: f64, vertical: f64) {
        if matches!(self.op, SeatOp::Default(_)) {
            DefaultOp::pointer_axis(self, tree, workspace, horizontal, vertical);
        } else {
            self.handle.pointer_notify_axis(horizontal, vertical);
        }
    }

    /// Re-evaluates the current op without any new input: `Default` simply
    /// re-runs its hover logic at the last known pointer location (picking
    /// up a window that moved under a static cursor), every other op
    /// re-derives its position-based state the same way a motion event
    /// would.
    pub fn rebase(&mut self, tree: &mut Tree, workspace: WorkspaceId) {
        if matches!(self.op, SeatOp::Default(_)) {
            DefaultOp::pointer_motion(self, tree, workspace);
            return;
        }
        let mut op = std::mem::replace(&mut self.op, SeatOp::Default(DefaultOp::default()));
        op.rebase(tree, self.pointer_location);
        self.op = op;
    }

    /// A tablet tool's tip touching down/lifting is routed exactly like a
    /// pointer button, using its primary button as the stand-in since
    /// `tessera-config` has no separate tablet binding table.
    pub fn tablet_tool_tip(&mut self, tree: &mut Tree, workspace: WorkspaceId, pressed: bool) {
        self.button(tree, workspace, MouseButton::Left, pressed);
    }

    /// A tablet tool's absolute-position motion is routed exactly like
    /// pointer motion once translated into the seat's logical coordinate
    /// space by the caller.
    pub fn tablet_tool_motion(&mut self, tree: &mut Tree, workspace: WorkspaceId, pointer: Point<f64, Logical>) {
        self.pointer_motion(tree, workspace, pointer);
    }
}

/// Where, relative to a window's outer/content split, a point landed. Drives
/// both mouse-binding matching and the default op's click-to-action chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Titlebar,
    Border,
    Contents,
    /// No window under the point at all (empty workspace gap).
    Workspace,
}

impl From<HitRegion> for Region {
    fn from(value: HitRegion) -> Self {
        match value {
            HitRegion::Titlebar => Region::Titlebar,
            HitRegion::Border => Region::Border,
            HitRegion::Contents => Region::Contents,
            HitRegion::Workspace => Region::Workspace,
        }
    }
}

/// The result of hit-testing the tree at a point: which window (if any) and
/// which part of it.
#[derive(Debug, Clone, Copy)]
pub struct HitTest {
    pub window: Option<WindowId>,
    pub region: HitRegion,
    /// The point, in the hit window's surface-local coordinate space; only
    /// meaningful when `region == Contents`.
    pub surface_local: Point<f64, Logical>,
}

impl Tree {
    /// Finds the topmost window whose outer box contains `point` on the
    /// given workspace's tiling + floating windows (floating windows are
    /// tested first, matching their higher stacking order), and classifies
    /// which part of it was hit.
    pub fn hit_test(&self, workspace: crate::tree::WorkspaceId, point: Point<f64, Logical>) -> HitTest {
        let ws = &self.workspaces[workspace].pending;
        for &window in ws.floating.iter().rev() {
            if let Some(hit) = self.hit_test_window(window, point) {
                return hit;
            }
        }
        for &column in &ws.tiling {
            for &window in &self.columns[column].pending.children {
                if let Some(hit) = self.hit_test_window(window, point) {
                    return hit;
                }
            }
        }
        HitTest {
            window: None,
            region: HitRegion::Workspace,
            surface_local: point,
        }
    }

    fn hit_test_window(&self, window: WindowId, point: Point<f64, Logical>) -> Option<HitTest> {
        let w = &self.windows[window].pending;
        let outer = w.outer_box_f64();
        if !outer.contains(point) {
            return None;
        }
        let content = w.content_box_f64();
        let region = if content.contains(point) {
            HitRegion::Contents
        } else if point.y < content.loc.y {
            HitRegion::Titlebar
        } else {
            HitRegion::Border
        };
        let surface_local = (point.x - content.loc.x, point.y - content.loc.y).into();
        Some(HitTest { window: Some(window), region, surface_local })
    }
}
