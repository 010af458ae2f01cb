//! Per-surface render engine
//!
//! ```text
//! Uninitialized --created--> Initializing --program linked--> Ready --vsync--> Ready
//!                                 |                              |
//!                                 +--any step fails--> Failed <--+ (fatal frame error)
//! Ready / Failed --destroyed--> Uninitialized
//! ```

use crate::backend::{GpuBackend, SurfaceSize};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::shader::METABALL_WGSL;
use crate::uniforms::MetaballUniforms;
use globule_core::{SharedSimulation, SimulationConfig};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Engine handle shared between the host thread and the render thread.
pub type SharedEngine<B> = Arc<Mutex<RenderEngine<B>>>;

pub(crate) fn lock_engine<B: GpuBackend>(
    engine: &Mutex<RenderEngine<B>>,
) -> MutexGuard<'_, RenderEngine<B>> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

pub struct RenderEngine<B: GpuBackend> {
    backend: B,
    state: EngineState,
    size: SurfaceSize,
    clear_color: [f32; 4],
    speed: f32,
    uniforms: Box<MetaballUniforms>,
}

impl<B: GpuBackend> RenderEngine<B> {
    pub fn new(backend: B, render: &RenderConfig, simulation: &SimulationConfig) -> Self {
        Self {
            backend,
            state: EngineState::Uninitialized,
            size: SurfaceSize::default(),
            clear_color: render.clear_color,
            speed: simulation.speed,
            uniforms: Box::new(MetaballUniforms::new(render, simulation.radius_squared())),
        }
    }

    /// Bring up the surface and link the metaball program.
    ///
    /// A surface that is already up is torn down first. Any failure leaves
    /// the engine `Failed` with nothing held; there is no retry.
    pub fn surface_created(
        &mut self,
        target: B::Target,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if self.state != EngineState::Uninitialized {
            self.surface_destroyed();
        }

        self.size = SurfaceSize::new(width, height);
        self.state = EngineState::Initializing;
        tracing::debug!(width, height, "Initializing surface");

        let result = self
            .backend
            .acquire(target, self.size)
            .and_then(|()| self.backend.build_program(METABALL_WGSL));

        match result {
            Ok(()) => {
                self.state = EngineState::Ready;
                tracing::info!(width, height, "Surface ready, starting render loop");
                Ok(())
            }
            Err(err) => {
                match err.stage() {
                    Some(stage) => tracing::error!(%stage, error = %err, "Surface init failed"),
                    None => tracing::error!(error = %err, "Surface init failed"),
                }
                self.backend.release();
                self.state = EngineState::Failed;
                Err(err)
            }
        }
    }

    /// Cache new dimensions. GPU resources follow on the next frame.
    pub fn surface_changed(&mut self, width: u32, height: u32) {
        self.size = SurfaceSize::new(width, height);
        tracing::debug!(width, height, "Surface size changed");
    }

    /// Release everything. Safe to call in any state, any number of times.
    pub fn surface_destroyed(&mut self) {
        if self.state != EngineState::Uninitialized {
            tracing::info!(state = ?self.state, "Tearing down surface");
        }
        self.backend.release();
        self.state = EngineState::Uninitialized;
    }

    /// One vsync pass: advance the simulation, then upload and draw what it
    /// produced.
    ///
    /// The simulation lock covers advance and the copy into the uniform block
    /// and is released before any GPU work. A fatal error moves the engine to
    /// `Failed`.
    pub fn render_frame(&mut self, simulation: &SharedSimulation) -> Result<(), RenderError> {
        if self.state != EngineState::Ready {
            return Err(RenderError::NotReady(self.state));
        }

        {
            let mut sim = simulation.lock();
            sim.advance(self.size.width as f32, self.size.height as f32, self.speed);
            self.uniforms.load_positions(sim.positions());
        }

        let result = self.backend.draw(self.size, self.clear_color, &self.uniforms);
        if let Err(err) = &result {
            if err.is_fatal() {
                tracing::error!(error = %err, "Fatal frame error, surface stopped");
                self.state = EngineState::Failed;
            }
        }
        result
    }

    /// Record a failure that happened outside the backend (e.g. the render
    /// thread could not start).
    pub fn fail(&mut self) {
        self.backend.release();
        self.state = EngineState::Failed;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == EngineState::Ready
    }

    /// True while the backend holds a surface and context.
    pub fn has_context(&self) -> bool {
        self.backend.is_acquired()
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn uniforms(&self) -> &MetaballUniforms {
        &self.uniforms
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.backend.refresh_interval()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InitStage;
    use crate::headless::HeadlessBackend;
    use globule_core::glam::Vec2;
    use globule_core::{Metaball, SimulationState};

    fn engine(backend: HeadlessBackend) -> RenderEngine<HeadlessBackend> {
        RenderEngine::new(backend, &RenderConfig::default(), &SimulationConfig::default())
    }

    #[test]
    fn create_reaches_ready() {
        let mut engine = engine(HeadlessBackend::new());
        assert_eq!(engine.state(), EngineState::Uninitialized);

        engine.surface_created((), 400, 800).unwrap();
        assert_eq!(engine.state(), EngineState::Ready);
        assert!(engine.has_context());
        assert!(engine.backend().has_program());
        assert_eq!(engine.size(), SurfaceSize::new(400, 800));
    }

    #[test]
    fn every_init_stage_failure_lands_in_failed() {
        for stage in InitStage::ALL {
            let mut engine = engine(HeadlessBackend::failing_at(stage));
            let err = engine.surface_created((), 100, 100).unwrap_err();
            assert_eq!(err.stage(), Some(stage));
            assert_eq!(engine.state(), EngineState::Failed);
            assert!(!engine.has_context());
        }
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut engine = engine(HeadlessBackend::new());
        engine.surface_created((), 10, 10).unwrap();
        engine.surface_destroyed();
        engine.surface_destroyed();
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert!(!engine.has_context());
        assert_eq!(engine.backend().releases(), 1);
    }

    #[test]
    fn frame_advances_before_upload() {
        let mut engine = engine(HeadlessBackend::new());
        engine.surface_created((), 200, 200).unwrap();

        let sim = SimulationState::with_seed(100, 1).into_shared();
        sim.lock()
            .push(Metaball::with_direction(Vec2::new(100.0, 100.0), Vec2::X, 25.0));

        engine.render_frame(&sim).unwrap();

        let upload = engine.backend().last_upload().unwrap();
        assert_eq!(upload.count, 1);
        assert_eq!(upload.balls[0][..2], [102.0, 100.0]);
        assert_eq!(upload.radius_squared, 625.0);
        assert_eq!(engine.backend().last_clear(), Some([0.04, 0.04, 0.1, 1.0]));
    }

    #[test]
    fn frame_before_ready_is_rejected() {
        let mut engine = engine(HeadlessBackend::new());
        let sim = SimulationState::new(10).into_shared();
        assert!(matches!(
            engine.render_frame(&sim),
            Err(RenderError::NotReady(EngineState::Uninitialized))
        ));
    }

    #[test]
    fn size_change_is_picked_up_next_frame() {
        let mut engine = engine(HeadlessBackend::new());
        engine.surface_created((), 100, 100).unwrap();
        engine.surface_changed(300, 150);
        assert_eq!(engine.backend().configured_size(), Some(SurfaceSize::new(100, 100)));

        let sim = SimulationState::new(10).into_shared();
        engine.render_frame(&sim).unwrap();
        assert_eq!(engine.backend().configured_size(), Some(SurfaceSize::new(300, 150)));
    }

    #[test]
    fn fatal_frame_error_fails_the_engine() {
        let mut engine = engine(HeadlessBackend::new().with_fatal_frames());
        engine.surface_created((), 100, 100).unwrap();
        let sim = SimulationState::new(10).into_shared();

        assert!(matches!(engine.render_frame(&sim), Err(RenderError::OutOfMemory)));
        assert_eq!(engine.state(), EngineState::Failed);
    }

    #[test]
    fn transient_frame_error_keeps_ready() {
        let mut engine = engine(HeadlessBackend::new().with_transient_failures(1));
        engine.surface_created((), 100, 100).unwrap();
        let sim = SimulationState::new(10).into_shared();

        assert!(engine.render_frame(&sim).is_err());
        assert!(engine.is_ready());
        assert!(engine.render_frame(&sim).is_ok());
    }

    #[test]
    fn recreate_replaces_previous_surface() {
        let mut engine = engine(HeadlessBackend::new());
        engine.surface_created((), 100, 100).unwrap();
        engine.surface_created((), 50, 60).unwrap();
        assert_eq!(engine.backend().releases(), 1);
        assert_eq!(engine.size(), SurfaceSize::new(50, 60));
        assert!(engine.is_ready());
    }
}
