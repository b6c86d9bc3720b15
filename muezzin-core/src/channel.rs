//! Schedule channel
//!
//! The only hand-off between the ingest side and the scheduler: a bounded
//! FIFO of daily schedules plus a binary "drain complete" semaphore that
//! flows the other way.
//!
//! ```text
//!  ingest ──push──► [ 31 × DailySchedule ] ──pop──► scheduler
//!     ▲                                                │
//!     └──────────── wait_drained ◄── signal_drained ───┘
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};

use crate::schedule::{DailySchedule, MAX_DAYS};

/// Queue depth: one month
pub const SCHEDULE_QUEUE_DEPTH: usize = MAX_DAYS;

/// Channel errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Queue stayed full; the rejected record is handed back
    Full(DailySchedule),
}

/// Bounded schedule queue with its drain-complete semaphore
pub struct ScheduleChannel<M: RawMutex> {
    queue: Channel<M, DailySchedule, SCHEDULE_QUEUE_DEPTH>,
    drained: Signal<M, ()>,
}

impl<M: RawMutex> Default for ScheduleChannel<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> ScheduleChannel<M> {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            drained: Signal::new(),
        }
    }

    /// Push a record, waiting at most `timeout` for space
    pub async fn push(
        &self,
        record: DailySchedule,
        timeout: Duration,
    ) -> Result<(), ChannelError> {
        with_timeout(timeout, self.queue.send(record))
            .await
            .map_err(|_| ChannelError::Full(record))
    }

    /// Push without waiting
    pub fn try_push(&self, record: DailySchedule) -> Result<(), ChannelError> {
        self.queue
            .try_send(record)
            .map_err(|_| ChannelError::Full(record))
    }

    /// Pop the oldest record, waiting at most `timeout`
    ///
    /// `None` means nothing arrived in time; callers poll again.
    pub async fn pop(&self, timeout: Duration) -> Option<DailySchedule> {
        with_timeout(timeout, self.queue.receive()).await.ok()
    }

    /// Pop without waiting
    pub fn try_pop(&self) -> Option<DailySchedule> {
        self.queue.try_receive().ok()
    }

    /// Records currently queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Scheduler side: the end-of-batch marker was consumed
    pub fn signal_drained(&self) {
        self.drained.signal(());
    }

    /// Ingest side: block until the scheduler has drained the batch
    ///
    /// No timeout. The scheduler always consumes the end-of-batch marker.
    pub async fn wait_drained(&self) {
        self.drained.wait().await
    }

    /// Whether a drain signal is pending (not yet taken by the ingest side)
    pub fn drain_pending(&self) -> bool {
        self.drained.signaled()
    }
}
