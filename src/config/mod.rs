//! # Configuration Management
//!
//! Loading, validating, and managing build-volume and slice settings.
//!
//! ## Module Organization
//!
//! - **types**: `BuildVolume`, `SliceSettings`, `PrinterSettings`
//! - **settings**: Settings validation (`PrintSettingsValidator`)
//! - **loader**: TOML file loading (`ConfigLoader`)

pub mod loader;
pub mod settings;
pub mod types;

pub use loader::ConfigLoader;
pub use settings::PrintSettingsValidator;
pub use types::{BuildVolume, ConfigError, PrinterSettings, SliceSettings};
