//! Async scheduler loop
//!
//! Pops daily schedules off the channel, announces each upcoming prayer
//! and sleeps until it is due.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};

use super::next::{PrayerScheduler, Selection};
use crate::channel::ScheduleChannel;
use crate::config::SchedulerConfig;
use crate::schedule::DailySchedule;
use crate::time::DateTime;
use crate::traits::{PrayerDisplay, WallClock};

/// What one pass of the scheduler loop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// Nothing arrived before the pop timeout
    Idle,
    /// End-of-batch marker consumed, ingest released
    BatchDrained,
    /// A daily record was worked through
    Processed,
}

/// Sleep until the wall clock reads `due` or later
///
/// Sleeps for the computed remainder, then re-checks. Setting the clock
/// ends a [`SoftwareClock`](crate::time::SoftwareClock) sleep early, so a
/// jump in either direction is picked up by the next pass.
pub async fn wait_until<C: WallClock>(clock: &C, due: DateTime) {
    loop {
        let remaining = due.to_unix() - clock.now().to_unix();
        if remaining <= 0 {
            return;
        }
        clock.sleep(remaining.min(u32::MAX as i64) as u32).await;
    }
}

/// Announce and wait out every remaining prayer of one record
pub async fn process_record<C, D>(
    scheduler: &mut PrayerScheduler,
    schedule: &DailySchedule,
    clock: &C,
    display: &mut D,
) where
    C: WallClock,
    D: PrayerDisplay,
{
    loop {
        let now = clock.now();
        match scheduler.select(schedule, now.time_of_day()) {
            Selection::Next(next) => {
                let due = next.due_at(now);
                info!("Next prayer {} at {}", next.prayer.name.as_str(), due);
                display.show_next_prayer(&next);
                wait_until(clock, due).await;
            }
            Selection::Deferred => {
                debug!("Day {} exhausted, rollover pending", schedule.date);
                return;
            }
            Selection::EndOfBatch => return,
        }
    }
}

/// One pass: pop a record and handle it
pub async fn step<M, C, D>(
    scheduler: &mut PrayerScheduler,
    channel: &ScheduleChannel<M>,
    clock: &C,
    display: &mut D,
    pop_timeout: Duration,
) -> StepOutcome
where
    M: RawMutex,
    C: WallClock,
    D: PrayerDisplay,
{
    let Some(schedule) = channel.pop(pop_timeout).await else {
        return StepOutcome::Idle;
    };

    if schedule.is_end_of_batch() {
        debug!("End of batch");
        channel.signal_drained();
        return StepOutcome::BatchDrained;
    }

    debug!("Processing {}", schedule.date);
    process_record(scheduler, &schedule, clock, display).await;
    StepOutcome::Processed
}

/// Scheduler loop. Never returns.
pub async fn run_scheduler<M, C, D>(
    channel: &ScheduleChannel<M>,
    clock: &C,
    display: &mut D,
    config: &SchedulerConfig,
) where
    M: RawMutex,
    C: WallClock,
    D: PrayerDisplay,
{
    let mut scheduler = PrayerScheduler::new();
    let pop_timeout = config.pop_timeout();
    let idle_poll = config.idle_poll();

    loop {
        if step(&mut scheduler, channel, clock, display, pop_timeout).await == StepOutcome::Idle {
            Timer::after(idle_poll).await;
        }
    }
}
