//! Globule Render System
//!
//! Draws metaballs with a full-surface fragment pass, paced to the display
//! refresh:
//! - `backend`: the GPU seam, with a wgpu implementation and a headless one
//! - `engine`: per-surface state machine (acquire, build program, draw, release)
//! - `vsync` + `scheduler`: one advance+draw per refresh, cancelled on teardown
//! - `surface` + `registry`: host lifecycle callbacks routed by surface id

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod headless;
pub mod registry;
pub mod scheduler;
pub mod shader;
pub mod surface;
pub mod uniforms;
pub mod vsync;
pub mod wgpu_backend;
pub mod window;

pub use backend::{GpuBackend, InitStage, SurfaceSize};
pub use config::RenderConfig;
pub use engine::{EngineState, RenderEngine};
pub use error::RenderError;
pub use headless::HeadlessBackend;
pub use registry::{SurfaceId, SurfaceRegistry, DEFAULT_SURFACE_ID};
pub use scheduler::{FrameScheduler, RenderThread};
pub use surface::{SurfaceLifecycle, SurfaceRenderer};
pub use uniforms::MetaballUniforms;
pub use vsync::{CancelToken, FrameLimit, FrameTick, IntervalVsync, VsyncSource};
pub use wgpu_backend::WgpuBackend;

pub use wgpu;
pub use winit;
