//! Device-free backend
//!
//! Goes through the same acquire / build / draw / release sequence as a real
//! GPU but only records what it was given. Failures can be injected at any
//! init stage or on a number of frames, which makes the engine's state
//! machine and the render loop observable in tests and in headless runs.

use crate::backend::{GpuBackend, InitStage, SurfaceSize};
use crate::error::RenderError;
use crate::uniforms::MetaballUniforms;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    fail_at: Option<InitStage>,
    transient_failures: u32,
    fatal_frame: bool,
    refresh: Option<Duration>,

    acquired: bool,
    program_built: bool,
    configured: Option<SurfaceSize>,
    presented: u64,
    failed_frames: u64,
    releases: u32,
    last_clear: Option<[f32; 4]>,
    last_upload: Option<Box<MetaballUniforms>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail bring-up at `stage`.
    pub fn failing_at(stage: InitStage) -> Self {
        Self {
            fail_at: Some(stage),
            ..Self::default()
        }
    }

    /// The next `count` draws fail with a transient frame error.
    pub fn with_transient_failures(mut self, count: u32) -> Self {
        self.transient_failures = count;
        self
    }

    /// Every draw fails with out-of-memory.
    pub fn with_fatal_frames(mut self) -> Self {
        self.fatal_frame = true;
        self
    }

    /// Report `interval` as the display refresh period.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh = Some(interval);
        self
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    pub fn frames_failed(&self) -> u64 {
        self.failed_frames
    }

    pub fn releases(&self) -> u32 {
        self.releases
    }

    pub fn has_program(&self) -> bool {
        self.program_built
    }

    pub fn configured_size(&self) -> Option<SurfaceSize> {
        self.configured
    }

    pub fn last_clear(&self) -> Option<[f32; 4]> {
        self.last_clear
    }

    pub fn last_upload(&self) -> Option<&MetaballUniforms> {
        self.last_upload.as_deref()
    }

    fn check(&self, stage: InitStage) -> Result<(), RenderError> {
        match self.fail_at {
            Some(failing) if failing == stage => Err(stage.error()),
            _ => Ok(()),
        }
    }
}

impl GpuBackend for HeadlessBackend {
    type Target = ();

    fn acquire(&mut self, _target: (), size: SurfaceSize) -> Result<(), RenderError> {
        for stage in [
            InitStage::Display,
            InitStage::Config,
            InitStage::Surface,
            InitStage::Context,
        ] {
            self.check(stage)?;
        }
        self.acquired = true;
        self.configured = Some(size);
        Ok(())
    }

    fn build_program(&mut self, wgsl: &str) -> Result<(), RenderError> {
        if !self.acquired {
            return Err(RenderError::Program("no current context".into()));
        }
        self.check(InitStage::Program)?;
        if !wgsl.contains("fs_main") {
            return Err(RenderError::Program("missing fragment entry point".into()));
        }
        self.program_built = true;
        Ok(())
    }

    fn draw(
        &mut self,
        size: SurfaceSize,
        clear_color: [f32; 4],
        uniforms: &MetaballUniforms,
    ) -> Result<(), RenderError> {
        if !self.program_built {
            return Err(RenderError::Frame("no program bound".into()));
        }
        if self.fatal_frame {
            self.failed_frames += 1;
            return Err(RenderError::OutOfMemory);
        }
        if self.transient_failures > 0 {
            self.transient_failures -= 1;
            self.failed_frames += 1;
            return Err(RenderError::Frame("injected timeout".into()));
        }

        self.configured = Some(size);
        self.last_clear = Some(clear_color);
        match &mut self.last_upload {
            Some(upload) => **upload = *uniforms,
            None => self.last_upload = Some(Box::new(*uniforms)),
        }
        self.presented += 1;
        Ok(())
    }

    fn release(&mut self) {
        if self.acquired || self.program_built {
            self.releases += 1;
        }
        self.acquired = false;
        self.program_built = false;
    }

    fn is_acquired(&self) -> bool {
        self.acquired
    }

    fn refresh_interval(&self) -> Option<Duration> {
        self.refresh
    }
}
