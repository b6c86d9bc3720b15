//! Schedule ingest
//!
//! Turns the phone's write buffers into batches of daily schedules:
//!
//! 1. `NUMBER_OF_DAYS` opens a batch and clears stale slots
//! 2. `PRAYER_TIMINGS` fills table slot `day - 1`
//! 3. `CURRENT_TIME` sets the wall clock and today's cursor
//! 4. `END_OF_TIMINGS` closes the batch; the table is flushed to the
//!    schedule channel starting at today, followed by an end-of-batch
//!    marker, and ingest waits until the scheduler has drained it

pub mod runner;
pub mod state;

pub use runner::{flush_batch, run_ingest};
pub use state::{Batch, BatchPhase, BatchReady, IngestState, Rejected, MAX_BATCH_LEN};
