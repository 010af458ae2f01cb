//! Metaball simulation state
//!
//! Owns the live balls and the flattened position buffer that mirrors them.
//! Spawning is capped; a spawn past the cap is logged and ignored because
//! the callers are fire-and-forget input events.

use crate::buffer::{PositionBuffer, MAX_METABALLS};
use crate::config::SimulationConfig;
use crate::metaball::Metaball;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct SimulationState {
    balls: Vec<Metaball>,
    positions: PositionBuffer,
    capacity: usize,
    seed: Option<u64>,
    rng: StdRng,
}

impl SimulationState {
    /// Empty simulation with headings drawn from an entropy-seeded source.
    pub fn new(capacity: usize) -> Self {
        Self::build(capacity, None)
    }

    /// Empty simulation whose spawn headings replay identically for the same seed.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::build(capacity, Some(seed))
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::build(config.effective_capacity(), config.seed)
    }

    fn build(capacity: usize, seed: Option<u64>) -> Self {
        let capacity = capacity.min(MAX_METABALLS);
        Self {
            balls: Vec::with_capacity(capacity),
            positions: PositionBuffer::new(),
            capacity,
            seed,
            rng: Self::seeded_rng(seed),
        }
    }

    fn seeded_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Drop every ball and reseed the heading source.
    pub fn initialize(&mut self) {
        self.balls.clear();
        self.positions.clear();
        self.rng = Self::seeded_rng(self.seed);
        tracing::info!(capacity = self.capacity, "Metaballs initialized");
    }

    /// Add a ball at `(x, y)` with a uniformly random heading.
    ///
    /// Returns `false` when the simulation is full; the request is dropped.
    pub fn spawn(&mut self, x: f32, y: f32, radius: f32) -> bool {
        if self.is_full() {
            tracing::warn!(capacity = self.capacity, "Maximum metaballs reached");
            return false;
        }

        let angle = self.rng.gen_range(0.0..TAU);
        self.push(Metaball::from_angle(Vec2::new(x, y), angle, radius))
    }

    /// Insert a prepared ball, respecting the capacity.
    pub fn push(&mut self, ball: Metaball) -> bool {
        if self.is_full() {
            tracing::warn!(capacity = self.capacity, "Maximum metaballs reached");
            return false;
        }

        self.balls.push(ball);
        tracing::info!(
            x = ball.position().x,
            y = ball.position().y,
            total = self.balls.len(),
            "Metaball added"
        );
        true
    }

    /// Remove every ball. Clearing an empty simulation is a no-op.
    pub fn clear_all(&mut self) {
        self.balls.clear();
        self.positions.clear();
        tracing::info!("All metaballs cleared");
    }

    /// Move every active ball one step inside a `width` x `height` surface and
    /// refresh the position buffer.
    pub fn advance(&mut self, width: f32, height: f32, speed: f32) {
        let bounds = Vec2::new(width, height);

        for (index, ball) in self.balls.iter_mut().enumerate() {
            if !ball.is_active() {
                continue;
            }
            ball.step(bounds, speed);
            self.positions.write(index, ball.position());
        }
        self.positions.set_len(self.balls.len());
    }

    pub fn count(&self) -> usize {
        self.balls.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.balls.len() >= self.capacity
    }

    pub fn balls(&self) -> &[Metaball] {
        &self.balls
    }

    pub fn positions(&self) -> &PositionBuffer {
        &self.positions
    }

    pub fn into_shared(self) -> SharedSimulation {
        SharedSimulation(Arc::new(Mutex::new(self)))
    }
}

/// Simulation handle shared between the render thread and input sources.
///
/// Every spawn, clear and advance goes through the one mutex, so a frame
/// always sees a fully advanced buffer.
#[derive(Clone)]
pub struct SharedSimulation(Arc<Mutex<SimulationState>>);

impl SharedSimulation {
    pub fn lock(&self) -> MutexGuard<'_, SimulationState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn spawn(&self, x: f32, y: f32, radius: f32) -> bool {
        self.lock().spawn(x, y, radius)
    }

    pub fn clear_all(&self) {
        self.lock().clear_all();
    }

    pub fn count(&self) -> usize {
        self.lock().count()
    }
}

impl From<SimulationState> for SharedSimulation {
    fn from(state: SimulationState) -> Self {
        state.into_shared()
    }
}
