//! Globule Core
//!
//! The CPU half of the metaball effect:
//! - `Metaball` influence sources with a fixed radius and unit heading
//! - `SimulationState`, the bounded collection that spawns, clears and advances them
//! - `PositionBuffer`, the flattened positions handed to the GPU each frame

pub mod buffer;
pub mod config;
pub mod metaball;
pub mod simulation;

pub use buffer::{PositionBuffer, MAX_METABALLS};
pub use config::SimulationConfig;
pub use glam;
pub use metaball::Metaball;
pub use simulation::{SharedSimulation, SimulationState};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
