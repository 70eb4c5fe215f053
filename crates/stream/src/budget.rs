use std::time::Duration;

use serde::Serialize;

/// Counters from the last position update plus running totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamStats {
    pub updates: u64,
    pub visible_chunks: usize,
    pub chunks_created: usize,
    pub queued_for_load: usize,
    pub queued_for_unload: usize,
    /// Ring coordinates skipped this update for lying outside the world.
    pub out_of_bounds: usize,
    /// Entries currently held in the chunk cache.
    pub cached_chunks: usize,
    /// Entries dropped by the cache ceiling since the manager was created.
    pub evictions: u64,
    pub update_time: Duration,
}

/// Ring buffer of recent update durations.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    history: Vec<Duration>,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    /// Timer remembering the last `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            history: vec![Duration::ZERO; capacity.max(1)],
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.history.len();
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn samples(&self) -> &[Duration] {
        if self.filled {
            &self.history
        } else {
            &self.history[..self.index]
        }
    }

    pub fn average(&self) -> Duration {
        let samples = self.samples();
        if samples.is_empty() {
            return Duration::ZERO;
        }
        samples.iter().sum::<Duration>() / samples.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.samples().iter().copied().max().unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.samples().iter().copied().min().unwrap_or_default()
    }

    /// Most recent sample.
    pub fn last(&self) -> Option<Duration> {
        if self.samples().is_empty() {
            return None;
        }
        let len = self.history.len();
        Some(self.history[(self.index + len - 1) % len])
    }

    pub fn count(&self) -> usize {
        self.samples().len()
    }

    pub fn capacity(&self) -> usize {
        self.history.len()
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_timer_tracks_history() {
        let mut timer = FrameTimer::new(3);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.max(), Duration::from_millis(30));
        assert_eq!(timer.min(), Duration::from_millis(10));
        assert_eq!(timer.last(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
        assert_eq!(timer.last(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(0);
        assert_eq!(timer.capacity(), 1);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.last(), None);
    }
}
