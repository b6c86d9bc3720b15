//! Scheduler task
//!
//! Works through the queued daily schedules and hands each upcoming
//! prayer to the display task.

use defmt::*;

use muezzin_core::config::SchedulerConfig;
use muezzin_core::scheduler::{run_scheduler, NextPrayer};
use muezzin_core::traits::PrayerDisplay;

use crate::channels::{CLOCK, NEXT_PRAYER, SCHEDULE_CHANNEL};

/// Forwards announcements to the display task without waiting on the UART
struct SignalDisplay;

impl PrayerDisplay for SignalDisplay {
    fn show_next_prayer(&mut self, next: &NextPrayer) {
        NEXT_PRAYER.signal(*next);
    }
}

/// Scheduler task - runs the next-prayer state machine
#[embassy_executor::task]
pub async fn scheduler_task(config: SchedulerConfig) {
    info!("Scheduler task started");

    run_scheduler(&SCHEDULE_CHANNEL, &CLOCK, &mut SignalDisplay, &config).await;
}
