//! Test doubles shared by the unit tests

use core::cell::Cell;

use heapless::{Deque, Vec};
use muezzin_protocol::PacketBuf;

use crate::schedule::{DailySchedule, DayTime, ScheduleDate};
use crate::scheduler::NextPrayer;
use crate::time::DateTime;
use crate::traits::{PacketSource, PrayerDisplay, WallClock};

/// Prayer times used across tests: 05:00, 12:30, 15:45, 18:10, 19:40
pub const SAMPLE_TIMES: [DayTime; 5] = [
    DayTime::new(5, 0),
    DayTime::new(12, 30),
    DayTime::new(15, 45),
    DayTime::new(18, 10),
    DayTime::new(19, 40),
];

/// A March 2024 day with [`SAMPLE_TIMES`]
pub fn sample_day(day: u8) -> DailySchedule {
    DailySchedule::new(ScheduleDate::new(day, 3, 2024), SAMPLE_TIMES)
}

/// Clock that only moves when told to, or when slept on
pub struct FakeClock {
    unix: Cell<i64>,
    slept: Cell<u32>,
}

impl FakeClock {
    pub fn at(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        let t = DateTime::new(year, month, day, hour, minute, second).unwrap();
        Self {
            unix: Cell::new(t.to_unix()),
            slept: Cell::new(0),
        }
    }

    /// Number of sleep() calls so far
    pub fn sleeps(&self) -> u32 {
        self.slept.get()
    }
}

impl WallClock for FakeClock {
    fn now(&self) -> DateTime {
        DateTime::from_unix(self.unix.get())
    }

    fn set(&self, time: DateTime) {
        self.unix.set(time.to_unix());
    }

    async fn sleep(&self, secs: u32) {
        self.slept.set(self.slept.get() + 1);
        self.unix.set(self.unix.get() + secs as i64);
    }
}

/// Display that remembers everything it was shown
#[derive(Default)]
pub struct RecordingDisplay {
    pub shown: Vec<NextPrayer, 64>,
}

impl PrayerDisplay for RecordingDisplay {
    fn show_next_prayer(&mut self, next: &NextPrayer) {
        self.shown.push(*next).unwrap();
    }
}

/// Source replaying queued writes, then pending forever
#[derive(Default)]
pub struct QueueSource {
    writes: Deque<PacketBuf, 64>,
}

impl QueueSource {
    pub fn push(&mut self, bytes: &[u8]) {
        let buf = PacketBuf::from_slice(bytes).unwrap();
        self.writes.push_back(buf).unwrap();
    }
}

impl PacketSource for QueueSource {
    async fn next_write(&mut self) -> PacketBuf {
        match self.writes.pop_front() {
            Some(buf) => buf,
            None => core::future::pending().await,
        }
    }
}
