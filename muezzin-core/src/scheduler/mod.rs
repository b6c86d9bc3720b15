//! Prayer scheduler
//!
//! Consumer side of the schedule channel. Each popped record is evaluated
//! against the wall clock; the next prayer is shown and waited for, over and
//! over, until the record has nothing left. End-of-batch markers are never
//! evaluated, they only release the ingest side.

pub mod next;
pub mod runner;

pub use next::{first_after, NextPrayer, NextPrayerState, PrayerScheduler, Selection, DISPLAY_TITLE};
pub use runner::{process_record, run_scheduler, step, wait_until, StepOutcome};
