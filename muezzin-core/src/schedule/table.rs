//! Month table
//!
//! Fixed array of 31 daily schedules indexed by day-of-month minus one.
//! Empty slots hold the sentinel schedule.

use super::DailySchedule;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Slots in a month table (longest month)
pub const MAX_DAYS: usize = 31;

/// How a NUMBER_OF_DAYS header shorter than the table clears stale slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ShortMonthPolicy {
    /// Clear only the last slot, as deployed senders expect.
    ///
    /// Months shorter than 30 days keep stale data in slots between
    /// `count` and the last slot.
    #[default]
    Legacy,
    /// Clear every slot past `count`
    ClearTrailing,
}

/// Errors when addressing a table slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// Day outside 1..=31
    DayOutOfRange(u8),
}

/// One month of daily schedules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTable {
    slots: [DailySchedule; MAX_DAYS],
}

impl Default for MonthTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MonthTable {
    /// Create a table with every slot empty
    pub const fn new() -> Self {
        Self {
            slots: [DailySchedule::SENTINEL; MAX_DAYS],
        }
    }

    /// Slot index for a 1-based day of month
    pub fn index_for_day(day: u8) -> Result<usize, TableError> {
        match day {
            1..=31 => Ok(day as usize - 1),
            _ => Err(TableError::DayOutOfRange(day)),
        }
    }

    /// Store a schedule at `day - 1`, replacing whatever was there
    pub fn insert(&mut self, day: u8, schedule: DailySchedule) -> Result<usize, TableError> {
        let index = Self::index_for_day(day)?;
        self.slots[index] = schedule;
        Ok(index)
    }

    /// Get the schedule in a slot (0-based)
    pub fn get(&self, index: usize) -> Option<&DailySchedule> {
        self.slots.get(index)
    }

    /// The final slot, used to detect short months
    pub fn last(&self) -> &DailySchedule {
        &self.slots[MAX_DAYS - 1]
    }

    /// Apply the day count announced by NUMBER_OF_DAYS
    pub fn apply_day_count(&mut self, count: u8, policy: ShortMonthPolicy) {
        if count as usize == MAX_DAYS {
            return;
        }
        match policy {
            ShortMonthPolicy::Legacy => self.slots[MAX_DAYS - 1] = DailySchedule::SENTINEL,
            ShortMonthPolicy::ClearTrailing => {
                let start = (count as usize).min(MAX_DAYS);
                for slot in &mut self.slots[start..] {
                    *slot = DailySchedule::SENTINEL;
                }
            }
        }
    }

    /// Reset every slot to the sentinel
    pub fn clear(&mut self) {
        self.slots = [DailySchedule::SENTINEL; MAX_DAYS];
    }

    /// Number of slots holding a real day
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_end_of_batch()).count()
    }

    /// Walk every slot once, starting at `start` and wrapping to slot 0
    pub fn iter_from(&self, start: usize) -> impl Iterator<Item = &DailySchedule> {
        let start = start % MAX_DAYS;
        self.slots[start..].iter().chain(self.slots[..start].iter())
    }
}
