//! Glues the tree to an event loop: owns every seat, ticks the transaction
//! manager once per iteration, and fans out the `TreeEvent`s a round raises
//! to the seats that need to react to them.

use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use calloop::{LoopHandle, LoopSignal};

use crate::input::Seat;
use crate::tree::{FocusTarget, Tree, TreeEvent};
use crate::utils::get_monotonic_time;

pub struct State {
    pub tree: Tree,
    pub seats: HashMap<String, Seat>,
    pub loop_handle: LoopHandle<'static, State>,
    pub loop_signal: LoopSignal,
    pub config_path: PathBuf,
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("tree", &self.tree)
            .field("seats", &self.seats.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl State {
    pub fn new(
        tree: Tree,
        loop_handle: LoopHandle<'static, State>,
        loop_signal: LoopSignal,
        config_path: PathBuf,
    ) -> Self {
        Self {
            tree,
            seats: HashMap::new(),
            loop_handle,
            loop_signal,
            config_path,
        }
    }

    /// Runs one iteration's worth of tree bookkeeping: flushes whatever
    /// transaction round is in flight, services urgency timeouts, then
    /// fans out the events the round raised to every seat. Meant to be
    /// driven from an idle/post-dispatch callback on the event loop rather
    /// than synchronously inside a single client request.
    pub fn dispatch(&mut self) {
        let now = get_monotonic_time();
        self.tree.flush_transactions(now);
        self.tree.root_service_urgent_timeouts(now);

        let events = self.tree.drain_events();
        if events.is_empty() {
            return;
        }

        let State { tree, seats, .. } = self;
        for event in events {
            match event {
                TreeEvent::WindowBeginDestroy(window) => {
                    for seat in seats.values_mut() {
                        seat.unref(tree, window);
                    }
                }
                TreeEvent::WindowDestroyed(window) => {
                    tracing::debug!(?window, "window freed");
                }
                TreeEvent::FocusChanged { old, new } => {
                    tracing::debug!(?old, ?new, "focus changed");
                    for seat in seats.values_mut() {
                        match new {
                            FocusTarget::Window(window) => seat.handle.keyboard_notify_enter(window),
                            FocusTarget::None => seat.handle.keyboard_clear_focus(),
                            FocusTarget::Layer | FocusTarget::UnmanagedSurface => {}
                        }
                    }
                }
                TreeEvent::SceneChanged => {}
            }
        }
    }

    /// Reloads the configuration file and, on success, swaps the new
    /// snapshot into the tree and every live seat. A parse failure is
    /// logged and the previous configuration keeps running rather than
    /// bricking the session.
    pub fn reload_config(&mut self) {
        match tessera_config::load(Some(self.config_path.clone())) {
            Ok((config, path)) => {
                self.config_path = path;
                let config = Rc::new(config);
                self.tree.config = config.clone();
                for seat in self.seats.values_mut() {
                    seat.set_config(config.clone());
                }
                tracing::info!("configuration reloaded");
            }
            Err(err) => {
                tracing::error!(?err, "failed to reload configuration, keeping the old one");
            }
        }
    }

    pub fn stop(&self) {
        self.loop_signal.stop();
    }
}
