//! Wall clock time
//!
//! Calendar conversions, the software clock that backs `WallClock` on
//! boards without an RTC, and validation for manually entered times.

pub mod clock;
pub mod datetime;
pub mod manual;

pub use clock::SoftwareClock;
pub use datetime::{days_in_month, is_leap_year, DateTime, TimeError};
pub use manual::ManualTime;
