//! Globule Services Layer
//!
//! Host-side plumbing around the renderer: settings files, pointer input,
//! and the two calls host code can make (`addMetaball`, `clearMetaballs`).

pub mod binding;
pub mod input;
pub mod settings;

pub use binding::{add_metaball, clear_metaballs, BindingError, BindingValue};
pub use input::PointerTracker;
pub use settings::{Settings, SettingsError};
