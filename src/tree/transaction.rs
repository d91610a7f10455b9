//! Coordinates the `pending -> committed -> current` lifecycle shared by
//! every tree entity.
//!
//! A round runs `before_commit -> commit -> apply -> after_apply` across
//! every entity touched since the last round. Between `commit` and `apply`
//! the round may stall: a view that needs to redraw at a new size acquires
//! a commit lock, and `apply` does not run until every outstanding lock is
//! released (by the view's own next commit) or `timeout` elapses, whichever
//! comes first. This mirrors the source's use of an event-loop timer rather
//! than blocking: `ensure_queued` only *requests* a round from the driving
//! loop (`State::dispatch` here), it never runs one synchronously.

use std::collections::HashSet;
use std::time::Duration;

use super::ids::EntityHandle;
use super::Tree;

/// How long a round waits for outstanding commit locks before forcing
/// `apply` anyway. Chosen to match a single frame's worth of slack at a
/// slow 30Hz refresh, matching the source's `TRANSACTION_TIMEOUT_MS=200`.
pub const COMMIT_LOCK_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Idle,
    AwaitingLocks { deadline: Duration },
}

#[derive(Debug, Default)]
pub struct TransactionManager {
    dirty: HashSet<EntityHandle>,
    after_apply: Vec<EntityHandle>,
    state: RoundState,
    commit_locks: u32,
    queued: bool,
}

impl Default for RoundState {
    fn default() -> Self {
        RoundState::Idle
    }
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` as needing a commit in the next round. Dedup is
    /// automatic (a `HashSet`); callers are expected to have already
    /// checked their own per-entity `dirty` flag before calling this, since
    /// that flag also drives their children's `*_set_dirty` cascade.
    pub fn register(&mut self, handle: EntityHandle) {
        self.dirty.insert(handle);
    }

    /// Arms the driving loop to call `Tree::flush_transactions` soon. A
    /// no-op if a round is already queued or in flight.
    pub fn ensure_queued(&mut self) {
        self.queued = true;
    }

    /// Consumes the "a round should run" flag. `State::dispatch` calls this
    /// once per loop iteration to decide whether to call
    /// `Tree::flush_transactions`.
    pub fn take_queued(&mut self) -> bool {
        std::mem::take(&mut self.queued)
    }

    pub fn is_round_in_progress(&self) -> bool {
        self.state != RoundState::Idle
    }

    pub fn acquire_commit_lock(&mut self) {
        self.commit_locks += 1;
    }

    /// Idempotent past zero: a view acknowledging a configure it was never
    /// sent (or acknowledging twice) must not underflow the counter.
    pub fn release_commit_lock(&mut self) {
        self.commit_locks = self.commit_locks.saturating_sub(1);
    }

    pub(crate) fn schedule_after_apply(&mut self, handle: EntityHandle) {
        self.after_apply.push(handle);
    }
}

impl Tree {
    /// Runs as many transaction-round phases as are currently ready:
    /// starts a new round if idle and something is dirty, or finishes an
    /// in-flight round once every commit lock is released or `now` has
    /// passed the round's deadline. Returns whether any work was done, so
    /// callers can decide whether to keep polling without a fixed-rate
    /// timer.
    pub fn flush_transactions(&mut self, now: Duration) -> bool {
        match self.transaction.state {
            RoundState::Idle => {
                if self.transaction.dirty.is_empty() {
                    false
                } else {
                    self.run_round(now);
                    true
                }
            }
            RoundState::AwaitingLocks { deadline } => {
                if self.transaction.commit_locks == 0 || now >= deadline {
                    self.finish_round();
                    true
                } else {
                    false
                }
            }
        }
    }

    fn run_round(&mut self, now: Duration) {
        debug_assert_eq!(self.transaction.state, RoundState::Idle);
        self.debug_check_invariants();
        self.root_commit_focus(now);

        let handles: Vec<EntityHandle> = self.transaction.dirty.drain().collect();
        for handle in handles {
            match handle {
                EntityHandle::Window(id) => {
                    if self.windows.contains_key(id) {
                        self.window_clear_dirty(id);
                        self.window_handle_commit(id);
                    }
                }
                EntityHandle::Column(id) => {
                    if self.columns.contains_key(id) {
                        self.column_clear_dirty(id);
                        self.column_handle_commit(id);
                    }
                }
                EntityHandle::Workspace(id) => {
                    if self.workspaces.contains_key(id) {
                        self.workspace_clear_dirty(id);
                        self.workspace_handle_commit(id);
                    }
                }
                EntityHandle::Output(id) => {
                    if self.outputs.contains_key(id) {
                        self.output_clear_dirty(id);
                        self.output_handle_commit(id);
                    }
                }
                EntityHandle::Root => {}
            }
        }

        self.transaction.state = RoundState::AwaitingLocks {
            deadline: now + COMMIT_LOCK_TIMEOUT,
        };
    }

    fn finish_round(&mut self) {
        debug_assert!(self.transaction.is_round_in_progress());
        self.transaction.commit_locks = 0;
        self.transaction.state = RoundState::Idle;

        // Apply runs over every entity that is still alive; dead entities
        // were already removed from their parent's child list at
        // `begin_destroy` time, so there is nothing left to reparent them
        // away from here.
        let windows: Vec<_> = self.windows.keys().collect();
        for id in windows {
            self.window_handle_apply(id);
        }
        let columns: Vec<_> = self.columns.keys().collect();
        for id in columns {
            self.column_handle_apply(id);
        }
        let workspaces: Vec<_> = self.workspaces.keys().collect();
        for id in workspaces {
            self.workspace_handle_apply(id);
        }
        let outputs: Vec<_> = self.outputs.keys().collect();
        for id in outputs {
            self.output_handle_apply(id);
        }

        self.push_event(super::TreeEvent::SceneChanged);
        self.root.scene_changed_signal.emit(&());

        let after_apply: Vec<EntityHandle> = std::mem::take(&mut self.transaction.after_apply);
        for handle in after_apply {
            match handle {
                EntityHandle::Window(id) => self.window_handle_after_apply(id),
                EntityHandle::Column(id) => self.column_handle_after_apply(id),
                EntityHandle::Workspace(id) => self.workspace_handle_after_apply(id),
                EntityHandle::Output(id) => self.output_handle_after_apply(id),
                EntityHandle::Root => {}
            }
        }

        if !self.transaction.dirty.is_empty() {
            self.transaction.ensure_queued();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{MockFactory, MockView};
    use super::*;

    fn make_tree() -> Tree {
        Tree::new(std::rc::Rc::new(tessera_config::Config::default()))
    }

    #[test]
    fn round_applies_pending_state_into_current() {
        let mut tree = make_tree();
        let id = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        tree.windows[id].pending.width = 640;
        tree.window_set_dirty(id);

        assert!(tree.flush_transactions(Duration::ZERO));
        assert_eq!(tree.windows[id].committed.width, 640);
        assert!(tree.flush_transactions(Duration::from_millis(1)));
        assert_eq!(tree.windows[id].current.width, 640);
    }

    #[test]
    fn round_stalls_until_commit_lock_released_or_timeout() {
        let mut tree = make_tree();
        let id = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        tree.windows[id].pending.width = 640;
        tree.windows[id].pending.content_width = 640;
        tree.window_set_dirty(id);
        tree.flush_transactions(Duration::ZERO);

        assert!(!tree.flush_transactions(Duration::from_millis(1)));
        tree.window_end_configure(id);
        assert!(tree.flush_transactions(Duration::from_millis(2)));
    }

    #[test]
    fn destroyed_window_is_freed_after_apply() {
        let mut tree = make_tree();
        let id = tree.window_create(Box::new(MockView::xdg(100, 100)), &mut MockFactory);
        tree.window_begin_destroy(id);
        tree.flush_transactions(Duration::ZERO);
        tree.flush_transactions(Duration::from_millis(1));
        assert!(!tree.windows.contains_key(id));
    }
}
