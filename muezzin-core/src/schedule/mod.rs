//! Daily prayer schedules
//!
//! A `DailySchedule` holds the five prayers of one calendar day. Schedules
//! travel by value from the ingest side to the scheduler, so every type in
//! here is `Copy` and fixed-size.

pub mod table;

pub use table::{MonthTable, ShortMonthPolicy, MAX_DAYS};

use core::fmt;

use muezzin_protocol::{HourMinute, TimingsPacket};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Time of day with minute resolution
///
/// Ordering is by hour, then minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayTime {
    pub hour: u8,
    pub minute: u8,
}

impl DayTime {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Is this a real time of day (00:00 to 23:59)
    pub const fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60
    }

    /// Minutes since midnight
    pub const fn minutes(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// The five daily prayers, plus a marker for unset entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    /// Unset slot or sentinel schedule
    None,
}

impl PrayerName {
    /// Wire order of the prayers in a PRAYER_TIMINGS packet
    pub const DAILY_ORDER: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
            PrayerName::None => "None",
        }
    }
}

/// A single prayer at a time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Prayer {
    pub hour: u8,
    pub minute: u8,
    pub name: PrayerName,
}

impl Prayer {
    /// Placeholder used by sentinel schedules
    pub const UNSET: Prayer = Prayer {
        hour: 0,
        minute: 0,
        name: PrayerName::None,
    };

    pub const fn new(name: PrayerName, hour: u8, minute: u8) -> Self {
        Self { hour, minute, name }
    }

    pub const fn time(&self) -> DayTime {
        DayTime::new(self.hour, self.minute)
    }

    pub fn is_set(&self) -> bool {
        self.name != PrayerName::None
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name.as_str(), self.time())
    }
}

/// Calendar date a schedule belongs to
///
/// `(0, 0, 0)` is reserved for the sentinel schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleDate {
    // Field order gives chronological Ord
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl ScheduleDate {
    pub const SENTINEL: ScheduleDate = ScheduleDate {
        year: 0,
        month: 0,
        day: 0,
    };

    pub const fn new(day: u8, month: u8, year: u16) -> Self {
        Self { year, month, day }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

impl fmt::Display for ScheduleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.day, self.month, self.year)
    }
}

/// The five prayers of one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailySchedule {
    pub fajr: Prayer,
    pub dhuhr: Prayer,
    pub asr: Prayer,
    pub maghrib: Prayer,
    pub isha: Prayer,
    pub date: ScheduleDate,
}

impl DailySchedule {
    /// End-of-batch marker and empty table slot
    pub const SENTINEL: DailySchedule = DailySchedule {
        fajr: Prayer::UNSET,
        dhuhr: Prayer::UNSET,
        asr: Prayer::UNSET,
        maghrib: Prayer::UNSET,
        isha: Prayer::UNSET,
        date: ScheduleDate::SENTINEL,
    };

    /// Build a schedule from five (hour, minute) pairs in daily order
    pub fn new(date: ScheduleDate, times: [DayTime; 5]) -> Self {
        let [fajr, dhuhr, asr, maghrib, isha] = times;
        Self {
            fajr: Prayer::new(PrayerName::Fajr, fajr.hour, fajr.minute),
            dhuhr: Prayer::new(PrayerName::Dhuhr, dhuhr.hour, dhuhr.minute),
            asr: Prayer::new(PrayerName::Asr, asr.hour, asr.minute),
            maghrib: Prayer::new(PrayerName::Maghrib, maghrib.hour, maghrib.minute),
            isha: Prayer::new(PrayerName::Isha, isha.hour, isha.minute),
            date,
        }
    }

    /// Build a schedule from a decoded PRAYER_TIMINGS packet
    ///
    /// Names are assigned by position, the wire carries none.
    pub fn from_packet(packet: &TimingsPacket) -> Self {
        let times = packet.times.map(|t| DayTime::new(t.hour, t.minute));
        let date = ScheduleDate::new(packet.day, packet.month, packet.year());
        Self::new(date, times)
    }

    /// Encode back into a PRAYER_TIMINGS payload
    ///
    /// The year goes out as `(year / 100, year % 100)`. Wire bytes with
    /// `year_lo > 99` decode to the same year as some in-range pair, so those
    /// packets do not come back byte for byte.
    pub fn to_packet(&self) -> TimingsPacket {
        let (year_hi, year_lo) = TimingsPacket::split_year(self.date.year);
        TimingsPacket {
            day: self.date.day,
            month: self.date.month,
            year_hi,
            year_lo,
            times: self.prayers().map(|p| HourMinute::new(p.hour, p.minute)),
        }
    }

    /// Is this the end-of-batch marker rather than a real day
    pub fn is_end_of_batch(&self) -> bool {
        self.date.is_sentinel()
    }

    /// Prayers in fixed daily order: Fajr, Dhuhr, Asr, Maghrib, Isha
    pub fn prayers(&self) -> [Prayer; 5] {
        [self.fajr, self.dhuhr, self.asr, self.maghrib, self.isha]
    }
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self::SENTINEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_day;
    use muezzin_protocol::Packet;
    use proptest::prelude::*;

    #[test]
    fn test_daytime_ordering() {
        assert!(DayTime::new(12, 30) > DayTime::new(12, 0));
        assert!(DayTime::new(13, 0) > DayTime::new(12, 59));
        assert_eq!(DayTime::new(5, 7).minutes(), 307);
    }

    #[test]
    fn test_sentinel_is_end_of_batch() {
        assert!(DailySchedule::SENTINEL.is_end_of_batch());
        assert!(!sample_day(1).is_end_of_batch());
        assert!(DailySchedule::SENTINEL
            .prayers()
            .iter()
            .all(|p| !p.is_set()));
    }

    #[test]
    fn test_prayers_in_daily_order() {
        let names = sample_day(3).prayers().map(|p| p.name);
        assert_eq!(names, PrayerName::DAILY_ORDER);
    }

    #[test]
    fn test_display_formatting() {
        let mut buf: heapless::String<32> = heapless::String::new();
        core::fmt::write(&mut buf, format_args!("{}", Prayer::new(PrayerName::Dhuhr, 12, 5)))
            .unwrap();
        assert_eq!(buf.as_str(), "Dhuhr 12:05");

        buf.clear();
        core::fmt::write(&mut buf, format_args!("{}", ScheduleDate::new(14, 3, 2024))).unwrap();
        assert_eq!(buf.as_str(), "14/3/2024");
    }

    #[test]
    fn test_daytime_validity() {
        assert!(DayTime::new(23, 59).is_valid());
        assert!(!DayTime::new(24, 0).is_valid());
        assert!(!DayTime::new(12, 60).is_valid());
    }

    #[test]
    fn test_oversized_year_byte_normalises_on_encode() {
        let received = TimingsPacket {
            day: 1,
            month: 1,
            year_hi: 20,
            year_lo: 150,
            times: [HourMinute::new(5, 0); 5],
        };
        let schedule = DailySchedule::from_packet(&received);
        assert_eq!(schedule.date.year, 2150);

        let sent = schedule.to_packet();
        assert_eq!((sent.year_hi, sent.year_lo), (21, 50));
        assert_eq!(DailySchedule::from_packet(&sent), schedule);
    }

    fn arb_daytime() -> impl Strategy<Value = DayTime> {
        (0u8..24, 0u8..60).prop_map(|(h, m)| DayTime::new(h, m))
    }

    proptest! {
        #[test]
        fn prop_wire_roundtrip(
            day in 1u8..=31,
            month in 1u8..=12,
            year in 2000u16..2100,
            times in proptest::array::uniform5(arb_daytime()),
        ) {
            let schedule = DailySchedule::new(ScheduleDate::new(day, month, year), times);
            let bytes = Packet::PrayerTimings(schedule.to_packet()).encode_to_vec().unwrap();

            let Ok(Packet::PrayerTimings(decoded)) = Packet::decode(&bytes) else {
                panic!("expected prayer timings");
            };
            prop_assert_eq!(DailySchedule::from_packet(&decoded), schedule);
        }
    }
}
