//! Ingest task
//!
//! Owns the month table and feeds it write buffers from the link.

use defmt::*;

use muezzin_core::config::IngestConfig;
use muezzin_core::ingest::{run_ingest, IngestState};
use muezzin_core::traits::PacketSource;
use muezzin_protocol::PacketBuf;

use crate::channels::{CLOCK, SCHEDULE_CHANNEL, WRITE_CHANNEL};

/// Write buffers queued by the link RX task
struct LinkSource;

impl PacketSource for LinkSource {
    async fn next_write(&mut self) -> PacketBuf {
        WRITE_CHANNEL.receive().await
    }
}

/// Ingest task - decodes writes and flushes finished batches
#[embassy_executor::task]
pub async fn ingest_task(config: IngestConfig) {
    info!("Ingest task started ({:?})", config.short_month_policy);

    let mut state = IngestState::new(config.short_month_policy);
    run_ingest(&mut LinkSource, &mut state, &SCHEDULE_CHANNEL, &CLOCK, &config).await;
}
