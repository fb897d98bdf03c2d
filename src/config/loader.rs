use std::path::Path;

use super::types::{ConfigError, PrinterSettings};

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PrinterSettings, ConfigError> {
        PrinterSettings::from_file(path)
    }

    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        PrinterSettings::default().to_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        ConfigLoader::write_default(&path).unwrap();
        let loaded = ConfigLoader::load(&path).unwrap();
        assert_eq!(loaded.build_volume.x_dim, PrinterSettings::default().build_volume.x_dim);
    }
}
