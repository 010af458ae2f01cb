//! Host-facing lifecycle for one surface
//!
//! `SurfaceRenderer` pairs a render engine with its simulation and owns the
//! render thread between surface-created and surface-destroyed.

use crate::backend::GpuBackend;
use crate::config::RenderConfig;
use crate::engine::{lock_engine, EngineState, RenderEngine, SharedEngine};
use crate::registry::SurfaceId;
use crate::scheduler::RenderThread;
use crate::vsync::{CancelToken, IntervalVsync};
use globule_core::{SharedSimulation, SimulationConfig, SimulationState};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Callbacks the host's surface component delivers.
///
/// All of them are fire-and-forget: failures are logged and show up as the
/// surface not rendering, never as a value the host has to handle.
pub trait SurfaceLifecycle {
    /// Native window the surface draws into.
    type Target;

    fn on_surface_created(&mut self, target: Self::Target, width: u32, height: u32);
    fn on_surface_changed(&mut self, width: u32, height: u32);
    fn on_surface_destroyed(&mut self);
    fn on_pointer_down(&mut self, x: f32, y: f32);
}

pub struct SurfaceRenderer<B: GpuBackend> {
    id: SurfaceId,
    engine: SharedEngine<B>,
    simulation: SharedSimulation,
    default_radius: f32,
    fallback_interval: Duration,
    render_thread: Option<RenderThread>,
}

impl<B: GpuBackend> SurfaceRenderer<B> {
    pub fn new(
        id: SurfaceId,
        backend: B,
        render: &RenderConfig,
        simulation: &SimulationConfig,
    ) -> Self {
        Self {
            id,
            engine: Arc::new(Mutex::new(RenderEngine::new(backend, render, simulation))),
            simulation: SimulationState::from_config(simulation).into_shared(),
            default_radius: simulation.default_radius,
            fallback_interval: render.fallback_interval(),
            render_thread: None,
        }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    /// Lock the engine. Holding the guard pauses the render loop.
    ///
    /// The render thread holds this lock through draw and present, so host
    /// calls that go through it (resize included) wait for the in-flight
    /// frame, up to one refresh.
    pub fn engine(&self) -> MutexGuard<'_, RenderEngine<B>> {
        lock_engine(&self.engine)
    }

    pub fn simulation(&self) -> &SharedSimulation {
        &self.simulation
    }

    pub fn state(&self) -> EngineState {
        self.engine().state()
    }

    /// True while a render loop is running for this surface.
    pub fn is_rendering(&self) -> bool {
        self.render_thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    /// Spawn a ball with the default radius. Dropped when full.
    pub fn spawn_at(&self, x: f32, y: f32) -> bool {
        self.simulation.spawn(x, y, self.default_radius)
    }

    pub fn clear(&self) {
        self.simulation.clear_all();
    }

    fn stop_render_thread(&mut self) {
        if let Some(mut thread) = self.render_thread.take() {
            let passes = thread.stop();
            tracing::debug!(surface = %self.id, ?passes, "Render loop stopped");
        }
    }
}

impl<B: GpuBackend> SurfaceLifecycle for SurfaceRenderer<B> {
    type Target = B::Target;

    fn on_surface_created(&mut self, target: B::Target, width: u32, height: u32) {
        tracing::debug!(surface = %self.id, width, height, "OnSurfaceCreated");
        self.stop_render_thread();
        self.simulation.lock().initialize();

        let interval = {
            let mut engine = lock_engine(&self.engine);
            if engine.surface_created(target, width, height).is_err() {
                return;
            }
            engine.refresh_interval().unwrap_or(self.fallback_interval)
        };

        let cancel = CancelToken::new();
        let vsync = IntervalVsync::new(interval, cancel.clone());
        match RenderThread::spawn(
            format!("render-{}", self.id),
            Arc::clone(&self.engine),
            self.simulation.clone(),
            vsync,
            cancel,
        ) {
            Ok(thread) => {
                tracing::info!(surface = %self.id, ?interval, "Render loop started");
                self.render_thread = Some(thread);
            }
            Err(err) => {
                tracing::error!(surface = %self.id, error = %err, "Could not start render thread");
                lock_engine(&self.engine).fail();
            }
        }
    }

    fn on_surface_changed(&mut self, width: u32, height: u32) {
        tracing::debug!(surface = %self.id, width, height, "OnSurfaceChanged");
        self.engine().surface_changed(width, height);
    }

    fn on_surface_destroyed(&mut self) {
        tracing::debug!(surface = %self.id, "OnSurfaceDestroyed");
        self.stop_render_thread();
        self.engine().surface_destroyed();
    }

    fn on_pointer_down(&mut self, x: f32, y: f32) {
        tracing::info!(surface = %self.id, x, y, "Pointer down");
        self.spawn_at(x, y);
    }
}

impl<B: GpuBackend> Drop for SurfaceRenderer<B> {
    fn drop(&mut self) {
        self.stop_render_thread();
        self.engine().surface_destroyed();
    }
}
