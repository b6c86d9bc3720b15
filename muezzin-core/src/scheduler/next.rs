//! Next-prayer selection
//!
//! Pure state machine: given one daily schedule and the current time of
//! day, decide which prayer comes next. No clocks, no channels.

use core::fmt;

use crate::schedule::{DailySchedule, DayTime, Prayer};
use crate::time::DateTime;

/// Title line shown above the prayer on the display
pub const DISPLAY_TITLE: &str = "Next Prayer:";

/// The prayer the display should announce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NextPrayer {
    pub prayer: Prayer,
    /// Falls on the day after the schedule being processed (rolled-over Fajr)
    pub next_day: bool,
}

impl NextPrayer {
    /// Wall time at which this prayer is due, relative to `now`
    pub fn due_at(&self, now: DateTime) -> DateTime {
        let day = if self.next_day { now.add_days(1) } else { now };
        day.at(self.prayer.time())
    }

    /// Write the three display lines, each terminated by CR LF
    pub fn write_lines<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(
            out,
            "{}\r\n{}\r\n{}\r\n",
            DISPLAY_TITLE,
            self.prayer.name.as_str(),
            self.prayer.time()
        )
    }
}

/// Scheduler state carried between records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NextPrayerState {
    /// Last prayer handed to the display, `Prayer::UNSET` before the first
    pub next_prayer: Prayer,
    /// Today's prayers are exhausted; the next record's Fajr is tomorrow's
    pub rollover_to_next_day: bool,
}

impl Default for NextPrayerState {
    fn default() -> Self {
        Self {
            next_prayer: Prayer::UNSET,
            rollover_to_next_day: false,
        }
    }
}

/// Outcome of evaluating a schedule at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selection {
    /// Show this prayer and wait for it
    Next(NextPrayer),
    /// Nothing left in this record; move on to the next one
    Deferred,
    /// End-of-batch marker, never a real day
    EndOfBatch,
}

/// First set prayer strictly later than `now`, in daily order
pub fn first_after(schedule: &DailySchedule, now: DayTime) -> Option<Prayer> {
    schedule
        .prayers()
        .into_iter()
        .find(|p| p.is_set() && p.time() > now)
}

/// Next-prayer state machine
///
/// When every prayer of a record has passed, the first evaluation defers:
/// the record is abandoned and the rollover flag is set. The following
/// record then yields its Fajr as tomorrow's prayer. A day whose records
/// stop arriving therefore produces no further announcements.
#[derive(Debug, Default)]
pub struct PrayerScheduler {
    state: NextPrayerState,
}

impl PrayerScheduler {
    pub const fn new() -> Self {
        Self {
            state: NextPrayerState {
                next_prayer: Prayer::UNSET,
                rollover_to_next_day: false,
            },
        }
    }

    pub fn state(&self) -> &NextPrayerState {
        &self.state
    }

    pub fn rollover_pending(&self) -> bool {
        self.state.rollover_to_next_day
    }

    /// Evaluate `schedule` at time of day `now`
    pub fn select(&mut self, schedule: &DailySchedule, now: DayTime) -> Selection {
        if schedule.is_end_of_batch() {
            return Selection::EndOfBatch;
        }

        if let Some(prayer) = first_after(schedule, now) {
            return self.choose(prayer, false);
        }

        if !self.state.rollover_to_next_day {
            self.state.rollover_to_next_day = true;
            return Selection::Deferred;
        }

        // Malformed record: nothing to roll over to, keep the flag for the next one
        if !schedule.fajr.is_set() {
            return Selection::Deferred;
        }

        self.state.rollover_to_next_day = false;
        self.choose(schedule.fajr, true)
    }

    fn choose(&mut self, prayer: Prayer, next_day: bool) -> Selection {
        self.state.next_prayer = prayer;
        Selection::Next(NextPrayer { prayer, next_day })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::PrayerName;
    use crate::testing::sample_day;
    use proptest::prelude::*;

    fn next(name: PrayerName, hour: u8, minute: u8, next_day: bool) -> Selection {
        Selection::Next(NextPrayer {
            prayer: Prayer::new(name, hour, minute),
            next_day,
        })
    }

    #[test]
    fn test_noon_selects_dhuhr() {
        let mut scheduler = PrayerScheduler::new();
        assert_eq!(
            scheduler.select(&sample_day(14), DayTime::new(12, 0)),
            next(PrayerName::Dhuhr, 12, 30, false)
        );
        assert_eq!(scheduler.state().next_prayer.name, PrayerName::Dhuhr);
    }

    #[test]
    fn test_exact_time_is_not_later() {
        let mut scheduler = PrayerScheduler::new();
        assert_eq!(
            scheduler.select(&sample_day(14), DayTime::new(12, 30)),
            next(PrayerName::Asr, 15, 45, false)
        );
    }

    #[test]
    fn test_minute_breaks_hour_tie() {
        let mut scheduler = PrayerScheduler::new();
        assert_eq!(
            scheduler.select(&sample_day(14), DayTime::new(18, 9)),
            next(PrayerName::Maghrib, 18, 10, false)
        );
    }

    #[test]
    fn test_after_isha_defers_then_rolls_over() {
        let mut scheduler = PrayerScheduler::new();
        let evening = DayTime::new(20, 0);

        assert_eq!(scheduler.select(&sample_day(14), evening), Selection::Deferred);
        assert!(scheduler.rollover_pending());

        assert_eq!(
            scheduler.select(&sample_day(15), evening),
            next(PrayerName::Fajr, 5, 0, true)
        );
        assert!(!scheduler.rollover_pending());
    }

    #[test]
    fn test_marker_never_selects() {
        let mut scheduler = PrayerScheduler::new();
        scheduler.select(&sample_day(14), DayTime::new(23, 0));

        assert_eq!(
            scheduler.select(&DailySchedule::SENTINEL, DayTime::new(0, 0)),
            Selection::EndOfBatch
        );
        // Rollover survives the marker
        assert!(scheduler.rollover_pending());
        assert_eq!(scheduler.state().next_prayer, Prayer::UNSET);
    }

    #[test]
    fn test_unset_prayers_never_match() {
        let mut schedule = sample_day(14);
        schedule.fajr = Prayer::UNSET;
        schedule.dhuhr = Prayer::UNSET;
        schedule.asr = Prayer::UNSET;
        schedule.maghrib = Prayer::UNSET;
        schedule.isha = Prayer::UNSET;

        let mut scheduler = PrayerScheduler::new();
        assert_eq!(scheduler.select(&schedule, DayTime::new(0, 0)), Selection::Deferred);
        assert_eq!(scheduler.select(&schedule, DayTime::new(0, 0)), Selection::Deferred);
        assert!(scheduler.rollover_pending());

        // A real record after the malformed one still rolls over
        assert_eq!(
            scheduler.select(&sample_day(15), DayTime::new(23, 0)),
            next(PrayerName::Fajr, 5, 0, true)
        );
    }

    #[test]
    fn test_due_at_next_day() {
        let now = DateTime::new(2024, 2, 28, 20, 0, 15).unwrap();
        let fajr = NextPrayer {
            prayer: Prayer::new(PrayerName::Fajr, 5, 0),
            next_day: true,
        };
        assert_eq!(fajr.due_at(now), DateTime::new(2024, 2, 29, 5, 0, 0).unwrap());

        let isha = NextPrayer {
            prayer: Prayer::new(PrayerName::Isha, 20, 30),
            next_day: false,
        };
        assert_eq!(isha.due_at(now), DateTime::new(2024, 2, 28, 20, 30, 0).unwrap());
    }

    #[test]
    fn test_display_lines() {
        let next = NextPrayer {
            prayer: Prayer::new(PrayerName::Maghrib, 18, 5),
            next_day: false,
        };
        let mut out: heapless::String<32> = heapless::String::new();
        next.write_lines(&mut out).unwrap();
        assert_eq!(out.as_str(), "Next Prayer:\r\nMaghrib\r\n18:05\r\n");
    }

    proptest! {
        #[test]
        fn prop_selection_is_later_than_now(hour in 0u8..24, minute in 0u8..60) {
            let now = DayTime::new(hour, minute);
            let mut scheduler = PrayerScheduler::new();
            match scheduler.select(&sample_day(14), now) {
                Selection::Next(n) => {
                    prop_assert!(n.prayer.time() > now);
                    prop_assert!(!n.next_day);
                    // Nothing earlier in the day was skipped
                    for p in sample_day(14).prayers() {
                        prop_assert!(p.time() <= now || p.time() >= n.prayer.time());
                    }
                }
                Selection::Deferred => prop_assert!(now >= DayTime::new(19, 40)),
                Selection::EndOfBatch => prop_assert!(false),
            }
        }
    }
}
