//! Per-worker counter windows and the rate derivative.

use std::collections::VecDeque;
use std::time::Instant;

/// One observation of a worker's cumulative request counter.
#[derive(Debug, Clone, Copy)]
pub struct LoadSample {
    pub at: Instant,
    pub counter: f64,
}

/// A short-lived sample history used to derive a request rate.
///
/// This is a derivative window, not a moving average: once a rate has
/// been computed from a sample it is evicted, so at most two samples are
/// ever live and the rate tracks recent behavior.
#[derive(Debug, Default)]
pub struct LoadWindow {
    samples: VecDeque<LoadSample>,
}

impl LoadWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample taken at `at`.
    pub fn push(&mut self, at: Instant, counter: f64) {
        self.samples.push_back(LoadSample { at, counter });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Derive the request rate from the oldest and newest samples.
    ///
    /// Fewer than two samples is a cold start and yields 0. Two samples
    /// with equal timestamps yield 0 without evicting, guarding the
    /// divide-by-zero without losing the sample. A successful
    /// computation evicts the oldest sample.
    pub fn rate(&mut self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }

        let oldest = *self.samples.front().expect("len checked");
        let latest = *self.samples.back().expect("len checked");

        let elapsed = latest.at.duration_since(oldest.at).as_secs_f64();
        if elapsed == 0.0 {
            return 0.0;
        }

        let rate = (latest.counter - oldest.counter) / elapsed;
        self.samples.pop_front();
        rate
    }
}
