//! Globule Runtime
//!
//! Hosts the metaball surface in a winit window: window lifecycle becomes
//! surface lifecycle, clicks and touches spawn balls, and the keyboard goes
//! through the same binding host code would use.
//!
//! `--headless` skips the window and drives a fixed number of frames through
//! the render loop with no GPU.

use anyhow::{Context, Result};
use clap::Parser;
use globule_core::SimulationState;
use globule_render::window::window_attributes;
use globule_render::{
    CancelToken, FrameLimit, FrameScheduler, HeadlessBackend, IntervalVsync, RenderEngine,
    SurfaceId, SurfaceRegistry, WgpuBackend,
};
use globule_services::{add_metaball, clear_metaballs, BindingValue, PointerTracker, Settings};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

#[derive(Debug, Parser)]
#[command(name = "globule", version, about = "Interactive metaballs")]
struct Args {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed seed for spawn headings
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window or GPU
    #[arg(long)]
    headless: bool,

    /// Frames to render in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Balls to spawn up front in headless mode
    #[arg(long, default_value_t = 12)]
    spawn: usize,

    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::info!("Globule v{}", globule_core::VERSION);

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.simulation.seed = args.seed;
    }

    if args.headless {
        run_headless(&settings, args.frames, args.spawn)
    } else {
        run_windowed(settings)
    }
}

fn run_windowed(settings: Settings) -> Result<()> {
    let event_loop = EventLoop::new().context("creating event loop")?;
    // The render thread paces itself; the host only reacts to events.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GlobuleApp::new(settings);
    event_loop.run_app(&mut app).context("running event loop")?;
    Ok(())
}

/// Render `frames` passes against the headless backend and report the result.
fn run_headless(settings: &Settings, frames: u64, spawn: usize) -> Result<()> {
    let width = settings.window.width;
    let height = settings.window.height;

    let mut engine = RenderEngine::new(
        HeadlessBackend::new(),
        &settings.render,
        &settings.simulation,
    );
    engine
        .surface_created((), width, height)
        .context("bringing up headless surface")?;

    let simulation = SimulationState::from_config(&settings.simulation).into_shared();
    {
        let mut sim = simulation.lock();
        sim.initialize();
        let center = (width as f32 / 2.0, height as f32 / 2.0);
        let ring = width.min(height) as f32 / 4.0;
        for i in 0..spawn {
            let angle = i as f32 / spawn.max(1) as f32 * std::f32::consts::TAU;
            sim.spawn(
                center.0 + ring * angle.cos(),
                center.1 + ring * angle.sin(),
                settings.simulation.default_radius,
            );
        }
    }

    let engine = Mutex::new(engine);
    let vsync = FrameLimit::new(
        IntervalVsync::new(settings.render.fallback_interval(), CancelToken::new()),
        frames,
    );
    let passes = FrameScheduler::new(vsync).run(&engine, &simulation);

    let mut engine = engine.into_inner().unwrap_or_else(PoisonError::into_inner);
    tracing::info!(
        passes,
        presented = engine.backend().frames_presented(),
        balls = simulation.count(),
        uploaded = engine.uniforms().count,
        "Headless run finished"
    );
    engine.surface_destroyed();
    Ok(())
}

struct GlobuleApp {
    settings: Settings,
    surface_id: SurfaceId,
    window: Option<Arc<Window>>,
    registry: SurfaceRegistry<WgpuBackend>,
    pointer: PointerTracker,
}

impl GlobuleApp {
    fn new(settings: Settings) -> Self {
        let registry = SurfaceRegistry::new(
            settings.render.clone(),
            settings.simulation.clone(),
            WgpuBackend::new,
        );
        Self {
            settings,
            surface_id: SurfaceId::default(),
            window: None,
            registry,
            pointer: PointerTracker::new(),
        }
    }

    fn handle(&self) -> BindingValue {
        BindingValue::Handle(self.surface_id.clone())
    }

    fn teardown(&mut self) {
        self.registry.surface_destroyed(&self.surface_id);
        self.window = None;
    }

    fn on_key(&mut self, key: &Key, event_loop: &ActiveEventLoop) {
        match key {
            Key::Character(c) if c.eq_ignore_ascii_case("c") => {
                clear_metaballs(&self.registry, &[self.handle()]);
            }
            Key::Named(NamedKey::Space) => {
                let Some(window) = &self.window else { return };
                let size = window.inner_size();
                add_metaball(
                    &self.registry,
                    &[
                        self.handle(),
                        BindingValue::Number(f64::from(size.width) / 2.0),
                        BindingValue::Number(f64::from(size.height) / 2.0),
                    ],
                );
            }
            Key::Named(NamedKey::Escape) => {
                self.teardown();
                event_loop.exit();
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for GlobuleApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes(&self.settings.window)) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                tracing::error!(error = %err, "Failed to create window");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.registry
            .surface_created(&self.surface_id, Arc::clone(&window), size.width, size.height);
        self.window = Some(window);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, shutting down...");
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.registry
                    .surface_changed(&self.surface_id, size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.moved(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.left();
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some((x, y)) = self.pointer.position() {
                    self.registry.pointer_down(&self.surface_id, x, y);
                }
            }
            WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
                self.registry.pointer_down(
                    &self.surface_id,
                    touch.location.x as f32,
                    touch.location.y as f32,
                );
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                self.on_key(&event.logical_key, event_loop);
            }
            _ => {}
        }
    }
}
