//! Ingest state machine
//!
//! Owns the month table on the ingest side and applies one write buffer at
//! a time. Nothing in here blocks; the async side lives in `runner`.
//!
//! Batch lifecycle:
//! ```text
//!              NUMBER_OF_DAYS                END_OF_TIMINGS
//!  ┌────────┐ ───────────────► ┌───────────┐ ─────────────► ┌──────────┐
//!  │ Sealed │                  │ Receiving │                │ Finished │
//!  └────────┘ ◄─────────────── └───────────┘                └──────────┘
//!       ▲         (boot)                                          │
//!       └─────────────────────── take_batch() ────────────────────┘
//! ```

use heapless::Vec;
use muezzin_protocol::{ClockPacket, Packet, PacketError};

use crate::schedule::{DailySchedule, MonthTable, PrayerName, ShortMonthPolicy, MAX_DAYS};
use crate::time::{DateTime, TimeError};
use crate::traits::WallClock;

/// Records in a flushed batch: a full month plus the end-of-batch marker
pub const MAX_BATCH_LEN: usize = MAX_DAYS + 1;

/// An ordered batch ready to be pushed onto the schedule channel
pub type Batch = Vec<DailySchedule, MAX_BATCH_LEN>;

/// Where the ingest side is in the batch lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatchPhase {
    /// Accepting PRAYER_TIMINGS
    Receiving,
    /// END_OF_TIMINGS seen, waiting to be flushed
    Finished,
    /// Flushed; daily records are refused until the next NUMBER_OF_DAYS
    Sealed,
}

/// Returned by [`IngestState::handle_write`] when a batch can be flushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatchReady {
    /// Day count from the last NUMBER_OF_DAYS header (31 if none was seen)
    pub expected_days: u8,
    /// Table slots holding a real day
    pub filled: usize,
}

/// Why a write had no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rejected {
    /// Buffer could not be decoded
    Malformed(PacketError),
    /// PRAYER_TIMINGS day byte outside 1..=31
    DayOutOfRange(u8),
    /// PRAYER_TIMINGS time past 23:59 for this prayer
    BadPrayerTime(PrayerName),
    /// CURRENT_TIME fields out of range
    BadClock(TimeError),
    /// Daily record or END_OF_TIMINGS outside a receiving batch
    BatchClosed,
}

/// Ingest-side state, owned by the ingest task
#[derive(Debug, Clone)]
pub struct IngestState {
    table: MonthTable,
    phase: BatchPhase,
    /// 1-based day of month from the last CURRENT_TIME, 0 before any sync
    cursor_day: u8,
    expected_days: u8,
    policy: ShortMonthPolicy,
}

impl Default for IngestState {
    fn default() -> Self {
        Self::new(ShortMonthPolicy::default())
    }
}

impl IngestState {
    pub const fn new(policy: ShortMonthPolicy) -> Self {
        Self {
            table: MonthTable::new(),
            phase: BatchPhase::Receiving,
            cursor_day: 0,
            expected_days: MAX_DAYS as u8,
            policy,
        }
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn table(&self) -> &MonthTable {
        &self.table
    }

    pub fn cursor_day(&self) -> u8 {
        self.cursor_day
    }

    pub fn expected_days(&self) -> u8 {
        self.expected_days
    }

    /// Apply one raw write buffer
    ///
    /// Unknown, short or out-of-range writes are logged and dropped: the
    /// link can deliver noise and there is nobody to report to.
    pub fn handle_write<C: WallClock>(&mut self, buf: &[u8], clock: &C) -> Option<BatchReady> {
        match self.apply(buf, clock) {
            Ok(ready) => ready,
            Err(reason) => {
                warn!("Ignoring write: {:?}", reason);
                None
            }
        }
    }

    /// Like [`handle_write`](Self::handle_write) but reports why a write was dropped
    pub fn apply<C: WallClock>(
        &mut self,
        buf: &[u8],
        clock: &C,
    ) -> Result<Option<BatchReady>, Rejected> {
        let packet = Packet::decode(buf).map_err(Rejected::Malformed)?;

        match packet {
            Packet::NumberOfDays { count } => {
                debug!("New batch: {} days", count);
                self.phase = BatchPhase::Receiving;
                self.expected_days = count;
                self.table.apply_day_count(count, self.policy);
                Ok(None)
            }
            Packet::PrayerTimings(timings) => {
                if self.phase != BatchPhase::Receiving {
                    return Err(Rejected::BatchClosed);
                }
                let schedule = DailySchedule::from_packet(&timings);
                // An impossible time would never be "passed" and pin the scheduler
                if let Some(bad) = schedule.prayers().iter().find(|p| !p.time().is_valid()) {
                    return Err(Rejected::BadPrayerTime(bad.name));
                }
                self.table
                    .insert(timings.day, schedule)
                    .map_err(|_| Rejected::DayOutOfRange(timings.day))?;
                trace!("Stored day {}", timings.day);
                Ok(None)
            }
            Packet::EndOfTimings => {
                if self.phase != BatchPhase::Receiving {
                    return Err(Rejected::BatchClosed);
                }
                self.phase = BatchPhase::Finished;
                let ready = BatchReady {
                    expected_days: self.expected_days,
                    filled: self.table.filled(),
                };
                info!(
                    "Batch complete: {} of {} days",
                    ready.filled, ready.expected_days
                );
                Ok(Some(ready))
            }
            Packet::CurrentTime(c) => {
                let time = clock_time(&c).map_err(Rejected::BadClock)?;
                clock.set(time);
                self.cursor_day = c.day;
                debug!("Clock set, cursor day {}", c.day);
                Ok(None)
            }
        }
    }

    /// Build the flush order for a finished batch and seal it
    ///
    /// Walks the table once starting at today's slot, wrapping to the start,
    /// keeps every real day and appends one end-of-batch marker. Returns
    /// `None` unless the batch is finished.
    pub fn take_batch(&mut self) -> Option<Batch> {
        if self.phase != BatchPhase::Finished {
            return None;
        }

        let start = match self.cursor_day {
            1..=31 => self.cursor_day as usize - 1,
            _ => 0,
        };

        let mut batch = Batch::new();
        for schedule in self.table.iter_from(start).filter(|s| !s.is_end_of_batch()) {
            // At most MAX_DAYS real days, capacity is MAX_DAYS + 1
            let _ = batch.push(*schedule);
        }
        let _ = batch.push(DailySchedule::SENTINEL);

        self.phase = BatchPhase::Sealed;
        Some(batch)
    }
}

/// Wall time carried by a CURRENT_TIME packet (month on the wire is 0-based)
fn clock_time(c: &ClockPacket) -> Result<DateTime, TimeError> {
    let month = c.month_index.checked_add(1).ok_or(TimeError::InvalidMonth(c.month_index))?;
    DateTime::normalized(c.year(), month, c.day, c.hour, c.minute, c.second)
}
