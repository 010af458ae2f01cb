//! Window management
//!
//! Cross-platform window creation via winit

use serde::{Deserialize, Serialize};
use winit::window::{Window, WindowAttributes};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Globule".to_string(),
            width: 400,
            height: 800,
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
}
