//! Civil date-time and Unix timestamp conversion
//!
//! Proleptic Gregorian calendar, no time zones. The device runs on local
//! wall time as set by the phone, so "Unix seconds" here are local seconds
//! since 1970-01-01 00:00:00.

use core::fmt;

use crate::schedule::DayTime;

const SECS_PER_DAY: i64 = 86_400;

/// Errors for out-of-range calendar fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    InvalidMonth(u8),
    InvalidDay(u8),
    InvalidHour(u8),
    InvalidMinute(u8),
    InvalidSecond(u8),
}

/// A calendar date and time of day, second resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    // Field order gives chronological Ord
    pub year: u16,
    /// 1-based month
    pub month: u8,
    /// 1-based day of month
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    pub const UNIX_EPOCH: DateTime = DateTime {
        year: 1970,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Build a date-time, rejecting out-of-range fields
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, TimeError> {
        if !(1..=12).contains(&month) {
            return Err(TimeError::InvalidMonth(month));
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(TimeError::InvalidDay(day));
        }
        check_clock_fields(hour, minute, second)?;
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Build a date-time, rolling an overlong day into the next month
    ///
    /// Day 31 of a 30-day month becomes the 1st of the following month,
    /// the same normalisation C's `mktime` applies.
    pub fn normalized(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, TimeError> {
        if !(1..=12).contains(&month) {
            return Err(TimeError::InvalidMonth(month));
        }
        if !(1..=31).contains(&day) {
            return Err(TimeError::InvalidDay(day));
        }
        check_clock_fields(hour, minute, second)?;
        let days = days_from_civil(year as i64, month as i64, day as i64);
        let secs = hour as i64 * 3600 + minute as i64 * 60 + second as i64;
        Ok(Self::from_unix(days * SECS_PER_DAY + secs))
    }

    /// Seconds since 1970-01-01 00:00:00
    pub const fn to_unix(&self) -> i64 {
        let days = days_from_civil(self.year as i64, self.month as i64, self.day as i64);
        days * SECS_PER_DAY + self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64
    }

    /// Inverse of [`to_unix`](Self::to_unix)
    ///
    /// Timestamps before year 0 clamp to the epoch.
    pub const fn from_unix(secs: i64) -> Self {
        let days = secs.div_euclid(SECS_PER_DAY);
        let rem = secs.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        if year < 0 || year > u16::MAX as i64 {
            return Self::UNIX_EPOCH;
        }
        Self {
            year: year as u16,
            month: month as u8,
            day: day as u8,
            hour: (rem / 3600) as u8,
            minute: (rem % 3600 / 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// Hour and minute of this instant
    pub const fn time_of_day(&self) -> DayTime {
        DayTime::new(self.hour, self.minute)
    }

    /// Same date at `time`, zero seconds
    pub const fn at(&self, time: DayTime) -> Self {
        Self {
            hour: time.hour,
            minute: time.minute,
            second: 0,
            ..*self
        }
    }

    /// Shift by whole days
    pub const fn add_days(&self, days: i64) -> Self {
        Self::from_unix(self.to_unix() + days * SECS_PER_DAY)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn check_clock_fields(hour: u8, minute: u8, second: u8) -> Result<(), TimeError> {
    if hour > 23 {
        return Err(TimeError::InvalidHour(hour));
    }
    if minute > 59 {
        return Err(TimeError::InvalidMinute(minute));
    }
    if second > 59 {
        return Err(TimeError::InvalidSecond(second));
    }
    Ok(())
}

pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 for a civil date (Howard Hinnant's algorithm)
///
/// `day` may exceed the month length; the excess rolls forward.
const fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Civil date for a count of days since 1970-01-01
const fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_epoch() {
        assert_eq!(DateTime::UNIX_EPOCH.to_unix(), 0);
        assert_eq!(DateTime::from_unix(0), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_known_timestamp() {
        let t = DateTime::new(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(t.to_unix(), 1_704_067_200);

        let t = DateTime::new(2026, 10, 16, 13, 37, 5).unwrap();
        assert_eq!(DateTime::from_unix(t.to_unix()), t);
    }

    #[test]
    fn test_leap_day() {
        assert!(DateTime::new(2024, 2, 29, 0, 0, 0).is_ok());
        assert_eq!(
            DateTime::new(2023, 2, 29, 0, 0, 0),
            Err(TimeError::InvalidDay(29))
        );
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
    }

    #[test]
    fn test_normalized_rolls_overlong_day() {
        let t = DateTime::normalized(2024, 4, 31, 8, 0, 0).unwrap();
        assert_eq!((t.month, t.day), (5, 1));

        let t = DateTime::normalized(2023, 2, 30, 0, 0, 0).unwrap();
        assert_eq!((t.month, t.day), (3, 2));
    }

    #[test]
    fn test_normalized_rejects_bad_fields() {
        assert_eq!(
            DateTime::normalized(2024, 13, 1, 0, 0, 0),
            Err(TimeError::InvalidMonth(13))
        );
        assert_eq!(
            DateTime::normalized(2024, 1, 0, 0, 0, 0),
            Err(TimeError::InvalidDay(0))
        );
        assert_eq!(
            DateTime::normalized(2024, 1, 1, 24, 0, 0),
            Err(TimeError::InvalidHour(24))
        );
    }

    #[test]
    fn test_add_days_crosses_year() {
        let t = DateTime::new(2024, 12, 31, 20, 0, 0).unwrap();
        let next = t.add_days(1);
        assert_eq!((next.year, next.month, next.day), (2025, 1, 1));
        assert_eq!(next.time_of_day(), DayTime::new(20, 0));
    }

    #[test]
    fn test_at_replaces_time_only() {
        let t = DateTime::new(2024, 3, 14, 11, 59, 42).unwrap();
        let due = t.at(DayTime::new(12, 30));
        assert_eq!(due, DateTime::new(2024, 3, 14, 12, 30, 0).unwrap());
    }

    proptest! {
        #[test]
        fn prop_unix_roundtrip(secs in 0i64..4_102_444_800) {
            prop_assert_eq!(DateTime::from_unix(secs).to_unix(), secs);
        }
    }
}
