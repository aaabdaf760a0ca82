pub use crate::settings_types::*;
use crate::storage_dir;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

impl Settings {
    pub fn default_path() -> PathBuf {
        storage_dir().join("settings.toml")
    }

    /// Reads settings from `path`. A missing file is created with defaults;
    /// an unreadable or invalid one is logged and replaced by defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("Creating default settings at {:?}", path);
            let default_settings = Settings::default();
            default_settings.save(path);
            return default_settings;
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Settings>(&content) {
                Ok(s) => {
                    info!("Loaded settings from {:?}", path);
                    s
                }
                Err(e) => {
                    error!("Failed to parse {:?}: {}", path, e);
                    Settings::default()
                }
            },
            Err(e) => {
                error!("Failed to read {:?}: {}", path, e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, path: &Path) {
        match toml::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    error!("Failed to write {:?}: {}", path, e);
                } else {
                    info!("Saved settings to {:?}", path);
                }
            }
            Err(e) => error!("Failed to serialize settings: {}", e),
        }
    }
}
