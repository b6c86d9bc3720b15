//! Display sink trait

use crate::scheduler::NextPrayer;

/// Receives the next prayer whenever the scheduler picks one
///
/// Fire-and-forget: the scheduler never waits for an acknowledgement.
pub trait PrayerDisplay {
    fn show_next_prayer(&mut self, next: &NextPrayer);
}
