//! The `View` collaborator: the wire-protocol layer's representation of a
//! mapped client surface. The core never constructs one; it receives a
//! `Box<dyn View>` when a surface maps and drives it through this trait.

use smithay::utils::{Logical, Rectangle, Serial, Size};

/// Which protocol produced this view. Shared fields (geometry, title, ...)
/// live on `Window`; protocol-specific behavior is resolved through this tag
/// rather than a second vtable, per the "polymorphism over View impl"
/// guidance: a capability interface with variant-specific logic on the enum
/// arm instead of a `container_of`-style downcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    XdgShell,
    Xwayland,
}

/// Operations the core calls on a mapped view.
///
/// A `View` is owned by exactly one `Window`; it is boxed because its
/// concrete type depends on the wire-protocol layer, which this crate does
/// not implement.
pub trait View: std::fmt::Debug {
    fn kind(&self) -> ViewKind;

    /// Natural (client-requested) size, used to pick a default floating
    /// geometry.
    fn natural_size(&self) -> Size<i32, Logical>;

    /// Requests the client resize/reposition its content to `geometry`.
    /// Returns the serial the client is expected to acknowledge (XDG shell);
    /// X11 clients acknowledge implicitly on their next commit, so the
    /// serial is a don't-care for `ViewKind::Xwayland`.
    fn configure(&mut self, geometry: Rectangle<i32, Logical>) -> Serial;

    fn set_fullscreen(&mut self, fullscreen: bool);
    fn set_tiled(&mut self, tiled: bool);
    fn set_activated(&mut self, activated: bool);
    fn set_resizing(&mut self, resizing: bool);

    /// Asks the client to close. Does not guarantee the view unmaps.
    fn close(&mut self);

    /// Captures the current buffer so it can keep being scanned out while a
    /// configure is in flight.
    fn freeze_buffer(&mut self);
    fn unfreeze_buffer(&mut self);

    /// Sent immediately on commit so the client can start redrawing before
    /// its new buffer is actually submitted and scanned out.
    fn send_frame_done(&mut self);

    /// Centers the surface geometry on its current output (X11 override
    /// redirect surfaces position themselves; everything else goes through
    /// `Window::floating_move_to_center` instead).
    fn center_surface(&mut self);

    fn is_urgent(&self) -> bool;

    /// Clears the urgency hint, whether because the user focused the
    /// window or because its timeout elapsed.
    fn clear_urgent(&mut self);

    /// Whether `self` is transient for (a descendant of) `other` in the
    /// client's own parent-child surface chain. Used to decide whether a
    /// popup is allowed to raise above a fullscreen ancestor.
    fn is_transient_for(&self, other: &dyn View) -> bool;
}

/// Events a view emits into the core. The wire-protocol layer calls these on
/// `Tree`/`Window`; they are not part of the `View` trait itself because
/// they flow in the opposite direction (view -> core, not core -> view).
#[derive(Debug)]
pub enum ViewEvent {
    Map,
    Unmap,
    /// The client committed a new surface state; `serial` is the configure
    /// serial it claims to acknowledge, if any (XDG shell only).
    Commit { serial: Option<Serial> },
    RequestFullscreen(bool),
    RequestMove,
    RequestResize,
    RequestActivate,
    SetTitle(String),
    SetHints { urgent: bool },
}
