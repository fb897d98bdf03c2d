//! Configuration types for the build volume and slice settings, loaded from
//! TOML the same way the teacher's `PrinterConfig`/`PrintSettings` are.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default crate-level value used whenever a configured dimension/spacing is
/// missing or non-positive (see `InvalidSetting` handling).
pub const DEFAULT_LAYER_HEIGHT: f64 = 0.1;
pub const DEFAULT_INFILL_SPACING: f64 = 0.1;
pub const DEFAULT_HEAD_SPEED: f64 = 1.0;

/// Build volume dimensions in millimeters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildVolume {
    /// X dimension (mm)
    pub x_dim: f64,
    /// Y dimension (mm)
    pub y_dim: f64,
    /// Z dimension (mm)
    pub z_dim: f64,
}

impl BuildVolume {
    pub fn new(x_dim: f64, y_dim: f64, z_dim: f64) -> Self {
        Self { x_dim, y_dim, z_dim }
    }

    pub fn contains_point(&self, x: f64, y: f64, z: f64) -> bool {
        x >= 0.0 && x <= self.x_dim && y >= 0.0 && y <= self.y_dim && z >= 0.0 && z <= self.z_dim
    }
}

impl Default for BuildVolume {
    fn default() -> Self {
        Self { x_dim: 203.2, y_dim: 152.4, z_dim: 203.2 }
    }
}

/// Settings controlling slicing granularity and print-head motion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SliceSettings {
    pub layer_height: f64,
    pub infill_spacing: f64,
    pub head_speed: f64,
}

impl SliceSettings {
    /// Coerces any non-positive field to its crate default, matching the
    /// original tool's behavior of silently substituting 0.1 for a zero or
    /// negative slice-size/infill-spacing entry rather than rejecting it.
    pub fn normalized(&self) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut out = *self;
        if out.layer_height <= 0.0 {
            warnings.push(format!(
                "layer_height {} is non-positive, using default {}",
                out.layer_height, DEFAULT_LAYER_HEIGHT
            ));
            out.layer_height = DEFAULT_LAYER_HEIGHT;
        }
        if out.infill_spacing <= 0.0 {
            warnings.push(format!(
                "infill_spacing {} is non-positive, using default {}",
                out.infill_spacing, DEFAULT_INFILL_SPACING
            ));
            out.infill_spacing = DEFAULT_INFILL_SPACING;
        }
        if out.head_speed <= 0.0 {
            warnings.push(format!(
                "head_speed {} is non-positive, using default {}",
                out.head_speed, DEFAULT_HEAD_SPEED
            ));
            out.head_speed = DEFAULT_HEAD_SPEED;
        }
        (out, warnings)
    }
}

impl Default for SliceSettings {
    fn default() -> Self {
        Self {
            layer_height: 12.7,
            infill_spacing: 12.7,
            head_speed: 1.0,
        }
    }
}

/// Top-level settings file: build volume plus slicing parameters, the unit
/// loaded/saved by `ConfigLoader`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct PrinterSettings {
    pub build_volume: BuildVolume,
    pub slice: SliceSettings,
}

impl PrinterSettings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializationError(e.to_string()))?;
        fs::write(path, contents).map_err(|e| ConfigError::IoError(e.to_string()))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_volume_contains_point() {
        let volume = BuildVolume::new(200.0, 200.0, 150.0);
        assert!(volume.contains_point(100.0, 100.0, 50.0));
        assert!(!volume.contains_point(-1.0, 100.0, 50.0));
        assert!(!volume.contains_point(100.0, 201.0, 50.0));
    }

    #[test]
    fn slice_settings_normalized_coerces_non_positive() {
        let settings = SliceSettings { layer_height: 0.0, infill_spacing: -1.0, head_speed: 2.0 };
        let (normalized, warnings) = settings.normalized();
        assert_eq!(normalized.layer_height, DEFAULT_LAYER_HEIGHT);
        assert_eq!(normalized.infill_spacing, DEFAULT_INFILL_SPACING);
        assert_eq!(normalized.head_speed, 2.0);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn default_settings_match_external_interface() {
        let defaults = PrinterSettings::default();
        assert_eq!(defaults.build_volume.x_dim, 203.2);
        assert_eq!(defaults.slice.layer_height, 12.7);
    }
}
