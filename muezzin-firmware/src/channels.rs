//! Inter-task communication channels
//!
//! Defines the statics shared between Embassy tasks. Uses embassy-sync
//! primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use muezzin_core::channel::ScheduleChannel;
use muezzin_core::config::DEFAULT_BOOT_UNIX_TIME;
use muezzin_core::scheduler::NextPrayer;
use muezzin_core::time::SoftwareClock;
use muezzin_protocol::PacketBuf;

/// Channel capacity for write buffers from the link
const WRITE_CHANNEL_SIZE: usize = 8;

/// Complete write buffers cut from the link byte stream
pub static WRITE_CHANNEL: Channel<CriticalSectionRawMutex, PacketBuf, WRITE_CHANNEL_SIZE> =
    Channel::new();

/// Daily schedules from ingest to the scheduler, plus the drain signal back
pub static SCHEDULE_CHANNEL: ScheduleChannel<CriticalSectionRawMutex> = ScheduleChannel::new();

/// Latest prayer to show (updated by the scheduler)
pub static NEXT_PRAYER: Signal<CriticalSectionRawMutex, NextPrayer> = Signal::new();

/// Wall clock, set by CURRENT_TIME packets and read by the scheduler
pub static CLOCK: SoftwareClock<CriticalSectionRawMutex> =
    SoftwareClock::from_unix(DEFAULT_BOOT_UNIX_TIME);
