//! Globule Metrics - frame pacing instrumentation
//!
//! Measures how long each update+draw pass takes so the render loop can
//! report FPS and frame-time spread. Everything compiles to no-ops unless
//! the `metrics` feature is enabled.
//!
//! # Usage
//!
//! ```ignore
//! use globule_metrics::FrameTimer;
//!
//! let mut timer = FrameTimer::new(120); // Track last 120 frames
//! timer.begin();
//! // ... advance + draw ...
//! timer.end();
//! let stats = timer.stats();
//! ```

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;

/// Snapshot of recent frame timings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frames measured since the timer was created.
    pub frames: u64,
    pub fps: f64,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Execute code only when metrics are enabled
#[macro_export]
macro_rules! metrics {
    ($($tt:tt)*) => {
        #[cfg(feature = "metrics")]
        {
            $($tt)*
        }
    };
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_window: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn frames(&self) -> u64 { 0 }
    pub fn stats(&self) -> FrameStats { FrameStats::default() }
}
