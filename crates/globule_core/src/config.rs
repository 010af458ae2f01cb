//! Simulation tuning

use crate::buffer::MAX_METABALLS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Maximum number of live balls. Clamped to `MAX_METABALLS`.
    pub capacity: usize,
    /// Radius in pixels for balls spawned from pointer input and host calls.
    pub default_radius: f32,
    /// Pixels moved per frame.
    pub speed: f32,
    /// Fixed seed for spawn headings. `None` reseeds from entropy on every initialize.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn effective_capacity(&self) -> usize {
        self.capacity.min(MAX_METABALLS)
    }

    pub fn radius_squared(&self) -> f32 {
        self.default_radius * self.default_radius
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_METABALLS,
            default_radius: 25.0,
            speed: 2.0,
            seed: None,
        }
    }
}
