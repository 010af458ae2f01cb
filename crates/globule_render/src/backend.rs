//! Rendering backend abstraction
//!
//! The engine drives any `GpuBackend`: `WgpuBackend` for real windows,
//! `HeadlessBackend` when there is no device to talk to.

use crate::error::RenderError;
use crate::uniforms::MetaballUniforms;
use std::fmt;
use std::time::Duration;

/// Steps of surface bring-up, in the order the engine reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitStage {
    /// Display / adapter connection
    Display,
    /// Color format and presentation negotiation
    Config,
    /// Drawing surface bound to the native window
    Surface,
    /// Rendering context (device + queue)
    Context,
    /// Shader compile and pipeline link
    Program,
}

impl InitStage {
    pub const ALL: [InitStage; 5] = [
        InitStage::Display,
        InitStage::Config,
        InitStage::Surface,
        InitStage::Context,
        InitStage::Program,
    ];

    /// Canonical error for a failure at this stage.
    pub fn error(self) -> RenderError {
        match self {
            InitStage::Display => RenderError::NoDisplay,
            InitStage::Config => RenderError::NoMatchingConfig("injected".into()),
            InitStage::Surface => RenderError::Surface("injected".into()),
            InitStage::Context => RenderError::Context("injected".into()),
            InitStage::Program => RenderError::Program("injected".into()),
        }
    }
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStage::Display => "display",
            InitStage::Config => "config",
            InitStage::Surface => "surface",
            InitStage::Context => "context",
            InitStage::Program => "program",
        };
        f.write_str(name)
    }
}

/// Surface dimensions in physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Nothing can be drawn into a zero-sized surface (minimized windows).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

pub trait GpuBackend: Send + 'static {
    /// Native window handle the drawing surface binds to.
    type Target: Send;

    /// Connect to the display, negotiate an 8-bit RGBA window-renderable
    /// configuration, create the surface and context, and make them current.
    fn acquire(&mut self, target: Self::Target, size: SurfaceSize) -> Result<(), RenderError>;

    /// Compile and link the metaball program from WGSL source.
    fn build_program(&mut self, wgsl: &str) -> Result<(), RenderError>;

    /// Clear, upload `uniforms`, draw the full-surface quad and present.
    ///
    /// `size` is the engine's cached surface size; the backend reconfigures
    /// its surface when it no longer matches.
    fn draw(
        &mut self,
        size: SurfaceSize,
        clear_color: [f32; 4],
        uniforms: &MetaballUniforms,
    ) -> Result<(), RenderError>;

    /// Drop the program, context and surface. Safe to call repeatedly.
    fn release(&mut self);

    /// True between a successful `acquire` and the next `release`.
    fn is_acquired(&self) -> bool;

    /// Refresh period of the display the surface is shown on, when known.
    fn refresh_interval(&self) -> Option<Duration> {
        None
    }
}
