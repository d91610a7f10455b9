use std::sync::OnceLock;
use std::time::{Duration, Instant};

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Same job as smithay's `Clock<Monotonic>`, but measured against this
/// process's own start time instead of `CLOCK_MONOTONIC` so nothing here
/// depends on a particular OS clock source. `Duration` arithmetic is also
/// just nicer to work with than smithay's `Time<Monotonic>`.
pub fn get_monotonic_time() -> Duration {
    EPOCH.get_or_init(Instant::now).elapsed()
}
