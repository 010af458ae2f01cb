//! Display refresh timing
//!
//! A `VsyncSource` hands out one tick per refresh and returns `None` once the
//! surface it belongs to is gone; the render loop ends with it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    /// Ticks handed out by this source so far, starting at 0.
    pub frame: u64,
    pub timestamp: Instant,
}

pub trait VsyncSource: Send {
    /// Block until the next refresh. `None` means the source is closed.
    fn next_frame(&mut self) -> Option<FrameTick>;
}

/// Shared stop flag tying a vsync source to its surface's lifetime.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Ticks at a fixed refresh period.
///
/// Deadlines advance by one period per tick. A pass that overruns gets the
/// next tick immediately and the schedule restarts from there; missed
/// refreshes are not made up.
pub struct IntervalVsync {
    interval: Duration,
    deadline: Option<Instant>,
    frame: u64,
    cancel: CancelToken,
}

impl IntervalVsync {
    pub fn new(interval: Duration, cancel: CancelToken) -> Self {
        Self {
            interval,
            deadline: None,
            frame: 0,
            cancel,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl VsyncSource for IntervalVsync {
    fn next_frame(&mut self) -> Option<FrameTick> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let now = Instant::now();
        let deadline = match self.deadline {
            Some(deadline) if deadline > now => deadline,
            Some(_) => now,
            None => now + self.interval,
        };
        if let Some(wait) = deadline.checked_duration_since(now) {
            std::thread::sleep(wait);
        }
        if self.cancel.is_cancelled() {
            return None;
        }

        self.deadline = Some(deadline + self.interval);
        let tick = FrameTick {
            frame: self.frame,
            timestamp: Instant::now(),
        };
        self.frame += 1;
        Some(tick)
    }
}

/// Closes after `limit` ticks of the wrapped source.
pub struct FrameLimit<V> {
    inner: V,
    remaining: u64,
}

impl<V: VsyncSource> FrameLimit<V> {
    pub fn new(inner: V, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }
}

impl<V: VsyncSource> VsyncSource for FrameLimit<V> {
    fn next_frame(&mut self) -> Option<FrameTick> {
        if self.remaining == 0 {
            return None;
        }
        let tick = self.inner.next_frame()?;
        self.remaining -= 1;
        Some(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_are_spaced_by_interval() {
        let mut vsync = IntervalVsync::new(Duration::from_millis(5), CancelToken::new());
        let first = vsync.next_frame().unwrap();
        let second = vsync.next_frame().unwrap();
        assert_eq!(first.frame, 0);
        assert_eq!(second.frame, 1);
        assert!(second.timestamp - first.timestamp >= Duration::from_millis(4));
    }

    #[test]
    fn cancelled_source_closes() {
        let token = CancelToken::new();
        let mut vsync = IntervalVsync::new(Duration::from_millis(1), token.clone());
        assert!(vsync.next_frame().is_some());
        token.cancel();
        assert!(vsync.next_frame().is_none());
        assert!(vsync.next_frame().is_none());
    }

    #[test]
    fn overrun_does_not_burst() {
        let mut vsync = IntervalVsync::new(Duration::from_millis(2), CancelToken::new());
        vsync.next_frame().unwrap();
        std::thread::sleep(Duration::from_millis(20));

        // One immediate tick for the late frame, then back to the period.
        let late = vsync.next_frame().unwrap();
        let next = vsync.next_frame().unwrap();
        assert!(next.timestamp - late.timestamp >= Duration::from_millis(1));
    }

    #[test]
    fn frame_limit_stops_after_count() {
        let vsync = IntervalVsync::new(Duration::from_micros(100), CancelToken::new());
        let mut limited = FrameLimit::new(vsync, 3);
        let ticks = std::iter::from_fn(|| limited.next_frame()).count();
        assert_eq!(ticks, 3);
    }
}
