//! Per-pass timing for the render loop

use super::ring_buffer::RingBuffer;
use crate::FrameStats;
use std::time::{Duration, Instant};

pub struct FrameTimer {
    pass_start: Instant,
    last_end: Option<Instant>,
    pass_times: RingBuffer<Duration>,
    intervals: RingBuffer<Duration>,
    frames: u64,
}

impl FrameTimer {
    pub fn new(window: usize) -> Self {
        Self {
            pass_start: Instant::now(),
            last_end: None,
            pass_times: RingBuffer::new(window),
            intervals: RingBuffer::new(window),
            frames: 0,
        }
    }

    pub fn begin(&mut self) {
        self.pass_start = Instant::now();
    }

    pub fn end(&mut self) {
        let now = Instant::now();
        self.pass_times.push(now - self.pass_start);
        if let Some(last) = self.last_end.replace(now) {
            self.intervals.push(now - last);
        }
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// FPS comes from the spacing between passes, so it reflects vsync
    /// pacing rather than how fast a single pass ran.
    pub fn stats(&self) -> FrameStats {
        let interval = self.intervals.mean().as_secs_f64();
        let (min, max) = self.pass_times.min_max();
        FrameStats {
            frames: self.frames,
            fps: if interval > 0.0 { 1.0 / interval } else { 0.0 },
            mean_ms: self.pass_times.mean().as_secs_f64() * 1000.0,
            min_ms: min.as_secs_f64() * 1000.0,
            max_ms: max.as_secs_f64() * 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frames_and_spacing() {
        let mut timer = FrameTimer::new(8);
        for _ in 0..3 {
            timer.begin();
            std::thread::sleep(Duration::from_millis(2));
            timer.end();
        }
        let stats = timer.stats();
        assert_eq!(stats.frames, 3);
        assert!(stats.fps > 0.0);
        assert!(stats.min_ms <= stats.max_ms);
        assert!(stats.mean_ms >= 1.0);
    }
}
