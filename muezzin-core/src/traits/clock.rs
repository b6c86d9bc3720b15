//! Wall clock trait

use crate::time::DateTime;

/// Process-wide wall clock
///
/// Shared between the ingest side (which sets it from CURRENT_TIME packets)
/// and the scheduler (which reads it), so every method takes `&self`.
#[allow(async_fn_in_trait)]
pub trait WallClock {
    /// Current local wall time
    fn now(&self) -> DateTime;

    /// Override the wall time. Always succeeds.
    fn set(&self, time: DateTime);

    /// Suspend the caller for roughly `secs` seconds of wall time
    async fn sleep(&self, secs: u32);
}
