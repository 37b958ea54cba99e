use std::collections::VecDeque;
use std::f64::consts::PI;

use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;

use crate::waveform::{SampleBatch, SamplePoint, CHANNEL_COUNT};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("channel count {requested} outside 1..={max}")]
    InvalidChannelCount { requested: usize, max: usize },
    #[error("sample interval must be greater than zero")]
    InvalidInterval,
}
/// Something that can yield multi-channel sample batches on demand.
pub trait SampleSource {
    fn next_batch(&mut self) -> Result<Option<SampleBatch>, SourceError>;
}
/// Synthetic test feed: per-channel sine/cosine carriers with uniform noise.
/// Power is left unset so the engine derives it from voltage and current.
pub struct SineSource {
    channel_count: usize,
    interval_secs: f64,
    time: f64,
    rng: StdRng,
}
impl SineSource {
    pub fn new(channel_count: usize, interval_secs: f64) -> Result<Self, SourceError> {
        if channel_count == 0 || channel_count > CHANNEL_COUNT {
            return Err(SourceError::InvalidChannelCount {
                requested: channel_count,
                max: CHANNEL_COUNT,
            });
        }
        if interval_secs <= 0.0 {
            return Err(SourceError::InvalidInterval);
        }
        Ok(Self {
            channel_count,
            interval_secs,
            time: 0.0,
            rng: StdRng::from_entropy(),
        })
    }
    pub fn set_channel_count(&mut self, channel_count: usize) -> Result<(), SourceError> {
        if channel_count == 0 || channel_count > CHANNEL_COUNT {
            return Err(SourceError::InvalidChannelCount {
                requested: channel_count,
                max: CHANNEL_COUNT,
            });
        }
        self.channel_count = channel_count;
        Ok(())
    }
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }
}
impl SampleSource for SineSource {
    fn next_batch(&mut self) -> Result<Option<SampleBatch>, SourceError> {
        let omega = 2.0 * PI * 1.25;
        let t = self.time;
        let mut batch = Vec::with_capacity(self.channel_count);
        for ch in 0..self.channel_count {
            // Each channel gets its own frequency multiple, amplitude and
            // offset so the curves stay distinguishable.
            let f = 0.8 + ch as f64 * 0.3;
            let voltage = (2.0 + ch as f64 * 0.5) * (omega * t * f).sin()
                + (2.0 + ch as f64 * 0.3)
                + self.rng.gen_range(0.0..0.1);
            let current = (0.5 + ch as f64 * 0.2) * (omega * t * f * 1.1).cos()
                + (0.5 + ch as f64 * 0.15)
                + self.rng.gen_range(0.0..0.15);
            batch.push((ch, SamplePoint::new(t, voltage, current)));
        }
        self.time += self.interval_secs;
        Ok(Some(batch))
    }
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<SampleBatch>,
}
impl ManualSource {
    pub fn new(batches: impl IntoIterator<Item = SampleBatch>) -> Self {
        Self {
            queue: batches.into_iter().collect(),
        }
    }
}
impl SampleSource for ManualSource {
    fn next_batch(&mut self) -> Result<Option<SampleBatch>, SourceError> {
        Ok(self.queue.pop_front())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn batches_cover_every_channel_with_monotonic_time() {
        let mut source = SineSource::new(3, 0.033).unwrap();
        let mut last_t = f64::NEG_INFINITY;
        for _ in 0..50 {
            let batch = source.next_batch().unwrap().unwrap();
            assert_eq!(batch.len(), 3);
            let t = batch[0].1.time;
            assert!(t > last_t);
            assert!(batch.iter().all(|(_, p)| p.time == t));
            assert!(batch.iter().all(|(_, p)| p.power.is_nan()));
            last_t = t;
        }
    }
    #[test]
    fn rejects_invalid_configuration() {
        assert!(SineSource::new(0, 0.033).is_err());
        assert!(SineSource::new(CHANNEL_COUNT + 1, 0.033).is_err());
        assert!(SineSource::new(3, 0.0).is_err());
        let mut source = SineSource::new(3, 0.033).unwrap();
        assert!(source.set_channel_count(CHANNEL_COUNT).is_ok());
        assert!(source.set_channel_count(0).is_err());
        assert_eq!(source.channel_count(), CHANNEL_COUNT);
    }
    #[test]
    fn manual_source_drains_its_queue() {
        let batch: SampleBatch = vec![(0, SamplePoint::new(0.0, 1.0, 2.0))];
        let mut source = ManualSource::new(vec![batch]);
        assert!(source.next_batch().unwrap().is_some());
        assert!(source.next_batch().unwrap().is_none());
    }
}
