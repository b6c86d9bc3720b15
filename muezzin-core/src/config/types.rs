//! Configuration type definitions
//!
//! Device settings read from the embedded `device.toml`. Every field has a
//! default that matches the deployed firmware, so an empty file is valid.

use embassy_time::Duration;

use crate::schedule::ShortMonthPolicy;
use crate::time::DateTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2024-01-01 00:00:00
pub const DEFAULT_BOOT_UNIX_TIME: i64 = 1_704_067_200;

/// Wireless bridge UART
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    pub baud_rate: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { baud_rate: 9600 }
    }
}

/// Ingest side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IngestConfig {
    /// Bound on a single schedule channel push before it is retried
    pub push_timeout_ms: u32,
    pub short_month_policy: ShortMonthPolicy,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            push_timeout_ms: 5,
            short_month_policy: ShortMonthPolicy::Legacy,
        }
    }
}

impl IngestConfig {
    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms as u64)
    }
}

/// Scheduler side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Bound on a single schedule channel pop
    pub pop_timeout_ms: u32,
    /// Pause after a pop that found nothing
    pub idle_poll_ms: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            pop_timeout_ms: 5,
            idle_poll_ms: 1000,
        }
    }
}

impl SchedulerConfig {
    pub fn pop_timeout(&self) -> Duration {
        Duration::from_millis(self.pop_timeout_ms as u64)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms as u64)
    }
}

/// Software clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClockConfig {
    /// Wall time at power-on, until the phone sends CURRENT_TIME
    pub boot_unix_time: i64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            boot_unix_time: DEFAULT_BOOT_UNIX_TIME,
        }
    }
}

impl ClockConfig {
    pub fn boot_time(&self) -> DateTime {
        DateTime::from_unix(self.boot_unix_time)
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceConfig {
    pub link: LinkConfig,
    pub ingest: IngestConfig,
    pub scheduler: SchedulerConfig,
    pub clock: ClockConfig,
}
