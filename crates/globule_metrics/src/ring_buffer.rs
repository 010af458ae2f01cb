//! Fixed-window sample history

use std::time::Duration;

/// Keeps the most recent `window` samples, overwriting the oldest.
pub struct RingBuffer<T> {
    samples: Vec<T>,
    window: usize,
    next: usize,
}

impl<T: Copy> RingBuffer<T> {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: Vec::with_capacity(window),
            window,
            next: 0,
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.samples.len() < self.window {
            self.samples.push(sample);
        } else {
            self.samples[self.next] = sample;
        }
        self.next = (self.next + 1) % self.window;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in storage order, not insertion order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.samples.iter().copied()
    }
}

impl RingBuffer<Duration> {
    pub fn mean(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.iter().sum::<Duration>() / self.samples.len() as u32
    }

    pub fn min_max(&self) -> (Duration, Duration) {
        let min = self.iter().min().unwrap_or(Duration::ZERO);
        let max = self.iter().max().unwrap_or(Duration::ZERO);
        (min, max)
    }
}
