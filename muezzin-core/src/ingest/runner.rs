//! Async ingest loop
//!
//! Pulls write buffers from the transport, feeds them to [`IngestState`]
//! and flushes each finished batch onto the schedule channel.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Duration;

use super::state::{Batch, IngestState};
use crate::channel::ScheduleChannel;
use crate::config::IngestConfig;
use crate::traits::{PacketSource, WallClock};

/// Push a batch in order, then wait for the scheduler to drain it
///
/// A push that times out is retried until it lands; records are never
/// dropped. Returns once the end-of-batch marker has been consumed.
pub async fn flush_batch<M: RawMutex>(
    batch: &Batch,
    channel: &ScheduleChannel<M>,
    push_timeout: Duration,
) {
    for record in batch.iter() {
        let mut retries = 0u32;
        while channel.push(*record, push_timeout).await.is_err() {
            if retries == 0 {
                warn!("Schedule channel full, retrying {}", record.date);
            }
            retries = retries.wrapping_add(1);
        }
    }

    debug!("Batch of {} queued, waiting for drain", batch.len());
    channel.wait_drained().await;
    info!("Batch drained");
}

/// Ingest loop
///
/// Never returns. While a batch is being flushed the transport is not read;
/// writes queue up in the source.
pub async fn run_ingest<S, C, M>(
    source: &mut S,
    state: &mut IngestState,
    channel: &ScheduleChannel<M>,
    clock: &C,
    config: &IngestConfig,
) where
    S: PacketSource,
    C: WallClock,
    M: RawMutex,
{
    let push_timeout = config.push_timeout();

    loop {
        let write = source.next_write().await;
        trace!("Write: {} bytes", write.len());

        if state.handle_write(&write, clock).is_none() {
            continue;
        }
        if let Some(batch) = state.take_batch() {
            flush_batch(&batch, channel, push_timeout).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DailySchedule, ShortMonthPolicy};
    use crate::testing::{sample_day, FakeClock, QueueSource};
    use crate::traits::PacketSource;
    use core::cell::Cell;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_futures::select::{select, Either};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_time::Timer;
    use heapless::Vec;
    use muezzin_protocol::{Packet, PacketBuf};

    type TestChannel = ScheduleChannel<CriticalSectionRawMutex>;

    const SHORT: Duration = Duration::from_millis(5);

    fn batch_of(days: core::ops::RangeInclusive<u8>) -> Batch {
        let mut batch: Batch = days.map(sample_day).collect();
        batch.push(DailySchedule::SENTINEL).unwrap();
        batch
    }

    /// Pop until the end-of-batch marker, then release the flush
    async fn drain(channel: &TestChannel) -> Vec<DailySchedule, 32> {
        let mut seen = Vec::new();
        loop {
            let Some(record) = channel.pop(Duration::from_millis(50)).await else {
                continue;
            };
            seen.push(record).unwrap();
            if record.is_end_of_batch() {
                channel.signal_drained();
                return seen;
            }
        }
    }

    #[test]
    fn test_flush_delivers_in_order() {
        let channel = TestChannel::new();
        let batch = batch_of(1..=3);

        let ((), seen) = block_on(join(flush_batch(&batch, &channel, SHORT), drain(&channel)));
        assert_eq!(&seen[..], &batch[..]);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_flush_retries_when_channel_full() {
        let channel = TestChannel::new();
        let batch = batch_of(1..=31);

        let late_drain = async {
            // Let the 32nd push time out a few times first
            Timer::after_millis(30).await;
            drain(&channel).await
        };
        let ((), seen) = block_on(join(flush_batch(&batch, &channel, SHORT), late_drain));

        assert_eq!(seen.len(), 32);
        assert_eq!(&seen[..], &batch[..]);
    }

    #[test]
    fn test_flush_blocks_until_drained() {
        let channel = TestChannel::new();
        let batch = batch_of(1..=2);

        let result = block_on(select(
            flush_batch(&batch, &channel, SHORT),
            Timer::after_millis(30),
        ));
        assert!(matches!(result, Either::Second(())));
        // Everything was queued; only the drain signal is missing
        assert_eq!(channel.len(), 3);
    }

    /// Counts writes handed to the ingest loop
    struct CountingSource<'a> {
        inner: QueueSource,
        taken: &'a Cell<usize>,
    }

    impl PacketSource for CountingSource<'_> {
        async fn next_write(&mut self) -> PacketBuf {
            let buf = self.inner.next_write().await;
            self.taken.set(self.taken.get() + 1);
            buf
        }
    }

    #[test]
    fn test_next_batch_waits_for_drain() {
        let channel = TestChannel::new();
        let clock = FakeClock::at(2024, 1, 1, 0, 0, 0);
        let mut state = IngestState::new(ShortMonthPolicy::Legacy);
        let config = IngestConfig::default();
        let taken = Cell::new(0);

        let mut inner = QueueSource::default();
        inner.push(&[0x69, 3]);
        for day in [1, 2, 3] {
            let packet = Packet::PrayerTimings(sample_day(day).to_packet());
            inner.push(&packet.encode_to_vec().unwrap());
        }
        inner.push(&[0x88]);
        inner.push(&[0x69, 29]);
        let mut source = CountingSource {
            inner,
            taken: &taken,
        };

        let scheduler_side = async {
            Timer::after_millis(30).await;
            // Batch queued, next NUMBER_OF_DAYS still unread
            assert_eq!(taken.get(), 5);
            assert_eq!(channel.len(), 4);

            Timer::after_millis(30).await;
            assert_eq!(taken.get(), 5);

            drain(&channel).await;
            Timer::after_millis(30).await;
            assert_eq!(taken.get(), 6);
        };

        let result = block_on(select(
            run_ingest(&mut source, &mut state, &channel, &clock, &config),
            scheduler_side,
        ));
        assert!(matches!(result, Either::Second(())));
        assert_eq!(state.expected_days(), 29);
        assert_eq!(state.phase(), crate::ingest::BatchPhase::Receiving);
    }

    #[test]
    fn test_next_batch_not_applied_while_sealed() {
        let channel = TestChannel::new();
        let clock = FakeClock::at(2024, 1, 1, 0, 0, 0);
        let mut state = IngestState::new(ShortMonthPolicy::Legacy);
        let config = IngestConfig::default();

        let mut source = QueueSource::default();
        source.push(&[0x69, 30]);
        source.push(&Packet::PrayerTimings(sample_day(1).to_packet()).encode_to_vec().unwrap());
        source.push(&[0x88]);
        source.push(&[0x69, 29]);

        // No scheduler: the drain never comes
        let result = block_on(select(
            run_ingest(&mut source, &mut state, &channel, &clock, &config),
            Timer::after_millis(30),
        ));
        assert!(matches!(result, Either::Second(())));
        assert_eq!(state.phase(), crate::ingest::BatchPhase::Sealed);
        assert_eq!(state.expected_days(), 30);
        assert_eq!(channel.len(), 2);
    }

    #[test]
    fn test_pipeline_from_writes_to_channel() {
        let channel = TestChannel::new();
        let clock = FakeClock::at(2024, 1, 1, 0, 0, 0);
        let mut state = IngestState::new(ShortMonthPolicy::Legacy);
        let config = IngestConfig::default();

        let mut source = QueueSource::default();
        source.push(&[0x69, 31]);
        for day in [1, 2, 3] {
            let packet = Packet::PrayerTimings(sample_day(day).to_packet());
            source.push(&packet.encode_to_vec().unwrap());
        }
        source.push(&[0x77]); // noise
        source.push(&[0x20, 9, 15, 0, 2, 2, 20, 24]);
        source.push(&[0x88]);

        let result = block_on(select(
            run_ingest(&mut source, &mut state, &channel, &clock, &config),
            drain(&channel),
        ));
        let Either::Second(seen) = result else {
            panic!("ingest loop returned");
        };

        let days: Vec<u8, 32> = seen.iter().map(|s| s.date.day).collect();
        // Cursor on the 2nd: walk starts at slot 1 and wraps
        assert_eq!(&days[..], &[2, 3, 1, 0]);
        assert_eq!(clock.now().time_of_day().hour, 9);
        assert_eq!(state.phase(), crate::ingest::BatchPhase::Sealed);
    }
}
