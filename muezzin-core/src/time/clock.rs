//! Software wall clock
//!
//! Keeps the wall time as a base timestamp plus the monotonic time elapsed
//! since it was set. Resolution is one second.
//!
//! Setting the clock wakes a pending `sleep`, so one sleeper (the scheduler)
//! never oversleeps a forward jump.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_futures::select::select;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Instant, Timer};

use super::DateTime;
use crate::traits::WallClock;

#[derive(Debug, Clone, Copy)]
struct ClockBase {
    /// Wall time at `at_ms`, seconds since the epoch
    unix: i64,
    /// Monotonic uptime when the base was captured
    at_ms: u64,
}

/// Wall clock driven by the embassy time driver
pub struct SoftwareClock<M: RawMutex> {
    base: Mutex<M, Cell<ClockBase>>,
    changed: Signal<M, ()>,
}

impl<M: RawMutex> SoftwareClock<M> {
    /// Create a clock that reads `initial` at boot (uptime zero)
    pub const fn new(initial: DateTime) -> Self {
        Self::from_unix(initial.to_unix())
    }

    /// Create a clock that reads `unix` seconds at boot
    pub const fn from_unix(unix: i64) -> Self {
        Self {
            base: Mutex::new(Cell::new(ClockBase { unix, at_ms: 0 })),
            changed: Signal::new(),
        }
    }
}

impl<M: RawMutex> WallClock for SoftwareClock<M> {
    fn now(&self) -> DateTime {
        let base = self.base.lock(|b| b.get());
        let elapsed_ms = Instant::now().as_millis().saturating_sub(base.at_ms);
        DateTime::from_unix(base.unix + (elapsed_ms / 1000) as i64)
    }

    fn set(&self, time: DateTime) {
        let base = ClockBase {
            unix: time.to_unix(),
            at_ms: Instant::now().as_millis(),
        };
        self.base.lock(|b| b.set(base));
        self.changed.signal(());
    }

    /// Ends after `secs`, or sooner if the clock is set meanwhile
    async fn sleep(&self, secs: u32) {
        self.changed.reset();
        select(Timer::after_secs(secs as u64), self.changed.wait()).await;
    }
}
