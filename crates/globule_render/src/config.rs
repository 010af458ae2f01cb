//! Render tuning

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Color buffer clear before the quad is drawn.
    pub clear_color: [f32; 4],
    /// Pixels with field sum >= `inner_threshold`.
    pub inner_color: [f32; 3],
    /// Pixels with field sum >= `glow_threshold`.
    pub glow_color: [f32; 3],
    pub background_color: [f32; 3],
    pub inner_threshold: f32,
    pub glow_threshold: f32,
    /// Pacing used when the display does not report its refresh rate.
    pub fallback_refresh_hz: f64,
}

impl RenderConfig {
    pub fn fallback_interval(&self) -> Duration {
        let hz = if self.fallback_refresh_hz.is_finite() && self.fallback_refresh_hz > 0.0 {
            self.fallback_refresh_hz
        } else {
            60.0
        };
        Duration::from_secs_f64(1.0 / hz)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.04, 0.04, 0.1, 1.0],
            inner_color: [0.1, 0.8, 0.9],
            glow_color: [0.05, 0.4, 0.6],
            background_color: [0.0, 0.0, 0.0],
            inner_threshold: 1.0,
            glow_threshold: 0.5,
            fallback_refresh_hz: 60.0,
        }
    }
}
