//! A typed event bus replacing the intrusive `wl_signal`/`wl_listener` idiom
//! the source relies on. Listeners are plain closures, registered in the
//! order they should run; there is no embedding, no `container_of`, no
//! pointer arithmetic to recover an owning struct from a callback.

/// An ordered list of listeners for events of type `T`.
///
/// Connecting twice registers two independent listeners; there is no
/// deduplication, matching `wl_signal`'s semantics where each
/// `wl_signal_add` call installs a distinct listener.
pub struct Signal<T> {
    listeners: Vec<Box<dyn FnMut(&T)>>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn connect(&mut self, listener: impl FnMut(&T) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Runs every listener, in registration order, with `event`.
    pub fn emit(&mut self, event: &T) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Signal;

    #[test]
    fn listeners_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut signal = Signal::<()>::new();

        let o1 = order.clone();
        signal.connect(move |()| o1.borrow_mut().push(1));
        let o2 = order.clone();
        signal.connect(move |()| o2.borrow_mut().push(2));

        signal.emit(&());
        assert_eq!(*order.borrow(), vec![1, 2]);
    }
}
