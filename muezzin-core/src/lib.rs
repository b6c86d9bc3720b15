//! Board-agnostic core logic for the prayer time display
//!
//! This crate contains everything between the wireless write handler and
//! the display that does not depend on specific hardware:
//!
//! - Schedule data model and the 31-slot month table
//! - Ingest state machine fed by raw write buffers
//! - Schedule channel with its drain-complete semaphore
//! - Next-prayer scheduler and its async runner
//! - Calendar math and the software wall clock
//! - Device configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to later modules
#[macro_use]
mod fmt;

pub mod channel;
pub mod config;
pub mod ingest;
pub mod schedule;
pub mod scheduler;
pub mod time;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
