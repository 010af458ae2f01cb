//! Vsync-driven render loop
//!
//! One advance+draw per tick, nothing queued. The loop ends when the vsync
//! source closes (surface torn down) or the engine leaves `Ready`.

use crate::backend::GpuBackend;
use crate::engine::{lock_engine, RenderEngine, SharedEngine};
use crate::vsync::{CancelToken, VsyncSource};
use globule_core::SharedSimulation;
use globule_metrics::FrameTimer;
use std::io;
use std::sync::Mutex;
use std::thread::JoinHandle;

/// Frames between FPS reports when metrics are on.
#[cfg_attr(not(feature = "metrics"), allow(dead_code))]
const REPORT_EVERY: u64 = 600;

pub struct FrameScheduler<V: VsyncSource> {
    vsync: V,
    timer: FrameTimer,
}

impl<V: VsyncSource> FrameScheduler<V> {
    pub fn new(vsync: V) -> Self {
        Self {
            vsync,
            timer: FrameTimer::new(120),
        }
    }

    /// Drive `engine` until the vsync source closes or the engine stops
    /// being ready. Returns the number of passes run.
    ///
    /// Transient frame errors are logged and the loop moves on to the next
    /// tick; only a fatal error (engine now `Failed`) ends it early.
    pub fn run<B: GpuBackend>(
        &mut self,
        engine: &Mutex<RenderEngine<B>>,
        simulation: &SharedSimulation,
    ) -> u64 {
        let mut passes = 0;

        while let Some(tick) = self.vsync.next_frame() {
            let mut engine = lock_engine(engine);
            if !engine.is_ready() {
                tracing::debug!(state = ?engine.state(), "Engine not ready, leaving render loop");
                break;
            }

            self.timer.begin();
            let result = engine.render_frame(simulation);
            self.timer.end();
            passes += 1;

            if let Err(err) = result {
                if !engine.is_ready() {
                    break;
                }
                tracing::warn!(frame = tick.frame, error = %err, "Frame dropped");
            }

            globule_metrics::metrics! {
                if self.timer.frames() % REPORT_EVERY == 0 {
                    let stats = self.timer.stats();
                    tracing::debug!(
                        fps = stats.fps,
                        mean_ms = stats.mean_ms,
                        max_ms = stats.max_ms,
                        "Render loop timing"
                    );
                }
            }
        }

        passes
    }
}

/// Background thread running a `FrameScheduler` for one surface.
///
/// Stopping cancels the vsync source and joins, so once `stop` returns no
/// further frame touches the engine.
pub struct RenderThread {
    cancel: CancelToken,
    handle: Option<JoinHandle<u64>>,
}

impl RenderThread {
    pub fn spawn<B, V>(
        name: String,
        engine: SharedEngine<B>,
        simulation: SharedSimulation,
        vsync: V,
        cancel: CancelToken,
    ) -> io::Result<Self>
    where
        B: GpuBackend,
        V: VsyncSource + 'static,
    {
        let handle = std::thread::Builder::new().name(name).spawn(move || {
            let passes = FrameScheduler::new(vsync).run(&engine, &simulation);
            tracing::debug!(passes, "Render loop exited");
            passes
        })?;

        Ok(Self {
            cancel,
            handle: Some(handle),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancel and join. Returns the number of passes run, or `None` if the
    /// thread was already stopped or panicked.
    pub fn stop(&mut self) -> Option<u64> {
        self.cancel.cancel();
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(passes) => Some(passes),
            Err(_) => {
                tracing::error!("Render thread panicked");
                None
            }
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.stop();
    }
}
