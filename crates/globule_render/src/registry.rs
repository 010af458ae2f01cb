//! Surface registry
//!
//! Maps surface identifiers to their renderer + simulation pair. Owned by the
//! composition root; an entry is created the first time a lifecycle event
//! names its id and removed on surface-destroyed.

use crate::backend::GpuBackend;
use crate::config::RenderConfig;
use crate::surface::{SurfaceLifecycle, SurfaceRenderer};
use globule_core::{SharedSimulation, SimulationConfig};
use std::collections::HashMap;
use std::fmt;

/// Identifier the host binding addresses when it has no better one.
pub const DEFAULT_SURFACE_ID: &str = "metaballs";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new(DEFAULT_SURFACE_ID)
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct SurfaceRegistry<B: GpuBackend> {
    surfaces: HashMap<SurfaceId, SurfaceRenderer<B>>,
    make_backend: Box<dyn Fn() -> B + Send>,
    render: RenderConfig,
    simulation: SimulationConfig,
}

impl<B: GpuBackend> SurfaceRegistry<B> {
    pub fn new(
        render: RenderConfig,
        simulation: SimulationConfig,
        make_backend: impl Fn() -> B + Send + 'static,
    ) -> Self {
        Self {
            surfaces: HashMap::new(),
            make_backend: Box::new(make_backend),
            render,
            simulation,
        }
    }

    /// Renderer for `id`, created on first use.
    pub fn surface(&mut self, id: &SurfaceId) -> &mut SurfaceRenderer<B> {
        let render = &self.render;
        let simulation = &self.simulation;
        let make_backend = &self.make_backend;
        self.surfaces.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(surface = %id, "Registering surface");
            SurfaceRenderer::new(id.clone(), make_backend(), render, simulation)
        })
    }

    pub fn get(&self, id: &SurfaceId) -> Option<&SurfaceRenderer<B>> {
        self.surfaces.get(id)
    }

    pub fn contains(&self, id: &SurfaceId) -> bool {
        self.surfaces.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn simulation(&self, id: &SurfaceId) -> Option<SharedSimulation> {
        self.get(id).map(|renderer| renderer.simulation().clone())
    }

    pub fn surface_created(&mut self, id: &SurfaceId, target: B::Target, width: u32, height: u32) {
        self.surface(id).on_surface_created(target, width, height);
    }

    pub fn surface_changed(&mut self, id: &SurfaceId, width: u32, height: u32) {
        self.surface(id).on_surface_changed(width, height);
    }

    pub fn pointer_down(&mut self, id: &SurfaceId, x: f32, y: f32) {
        self.surface(id).on_pointer_down(x, y);
    }

    /// Tear down and forget `id`. Unknown ids are ignored.
    pub fn surface_destroyed(&mut self, id: &SurfaceId) {
        match self.surfaces.remove(id) {
            Some(mut renderer) => renderer.on_surface_destroyed(),
            None => tracing::debug!(surface = %id, "Destroy for unknown surface ignored"),
        }
    }
}

impl<B: GpuBackend> Drop for SurfaceRegistry<B> {
    fn drop(&mut self) {
        for (_, mut renderer) in self.surfaces.drain() {
            renderer.on_surface_destroyed();
        }
    }
}
