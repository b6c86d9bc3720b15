//! Manually entered clock adjustments
//!
//! A debug console may ask to set the day of month, hour and minute
//! directly. Values are checked here before the clock is touched.

use super::{DateTime, TimeError};
use crate::traits::WallClock;

const MIN_DAY: u8 = 1;
const MAX_DAY: u8 = 31;
const MAX_HOUR: u8 = 23;
const MAX_MINUTE: u8 = 59;

/// A validated day/hour/minute override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManualTime {
    day: u8,
    hour: u8,
    minute: u8,
}

impl ManualTime {
    /// Validate raw values
    ///
    /// Rejected values leave no trace; the clock is only touched by
    /// [`apply`](Self::apply).
    pub fn new(day: u8, hour: u8, minute: u8) -> Result<Self, TimeError> {
        if !(MIN_DAY..=MAX_DAY).contains(&day) {
            return Err(TimeError::InvalidDay(day));
        }
        if hour > MAX_HOUR {
            return Err(TimeError::InvalidHour(hour));
        }
        if minute > MAX_MINUTE {
            return Err(TimeError::InvalidMinute(minute));
        }
        Ok(Self { day, hour, minute })
    }

    /// Replace day, hour and minute of `now`, keeping year, month and seconds
    ///
    /// A day past the end of the month rolls into the next one.
    pub fn apply_to(&self, now: DateTime) -> DateTime {
        // Every field was range-checked in new(), and now.month is valid
        DateTime::normalized(now.year, now.month, self.day, self.hour, self.minute, now.second)
            .unwrap_or(now)
    }

    /// Set the clock and return the new wall time
    pub fn apply<C: WallClock>(&self, clock: &C) -> DateTime {
        let time = self.apply_to(clock.now());
        clock.set(time);
        time
    }
}
