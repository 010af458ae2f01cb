//! Settings management

use globule_core::SimulationConfig;
use globule_render::window::WindowConfig;
use globule_render::RenderConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything tunable, one section per crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowConfig,
    pub simulation: SimulationConfig,
    pub render: RenderConfig,
}

impl Settings {
    /// Read settings from a JSON file. Missing sections and fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&text)?;
        tracing::info!(path = %path.as_ref().display(), "Settings loaded");
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let settings = Settings::default();
        assert_eq!(settings.simulation.capacity, 100);
        assert_eq!(settings.simulation.default_radius, 25.0);
        assert_eq!(settings.simulation.speed, 2.0);
        assert_eq!(settings.render.inner_threshold, 1.0);
        assert_eq!(settings.render.glow_threshold, 0.5);
    }

    #[test]
    fn save_then_load_preserves_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("globule.json");

        let mut settings = Settings::default();
        settings.simulation.seed = Some(12);
        settings.render.glow_color = [1.0, 0.0, 0.5];
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn sparse_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sparse.json");
        std::fs::write(&path, r#"{ "simulation": { "speed": 5.0 } }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.simulation.speed, 5.0);
        assert_eq!(settings.simulation.default_radius, 25.0);
        assert_eq!(settings.window, WindowConfig::default());
    }

    #[test]
    fn bad_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Settings::load(&path), Err(SettingsError::Parse(_))));
        assert!(matches!(
            Settings::load(dir.path().join("missing.json")),
            Err(SettingsError::Io(_))
        ));
    }
}
