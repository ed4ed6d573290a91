use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    seen_welcome: bool,
}

/// Durable key-value settings backing the onboarding gate.
///
/// Persistence is non-critical: a missing, unreadable, or unwritable file
/// degrades to first-run defaults with a logged warning.
pub struct SettingsStore {
    path: PathBuf,
    values: SettingsFile,
}

impl SettingsStore {
    /// Open the settings file in the platform config directory, falling back
    /// to the temp directory if the platform directories cannot be resolved.
    pub fn open() -> Self {
        let path = match ProjectDirs::from("org", "mesh-flasher", "Mesh Flasher") {
            Some(project_dirs) => {
                let config_dir = project_dirs.config_dir().to_path_buf();
                if let Err(e) = fs::create_dir_all(&config_dir) {
                    warn!("failed to create config directory: {e}");
                }
                config_dir.join("settings.toml")
            }
            None => {
                warn!("could not determine platform config directory");
                std::env::temp_dir().join("mesh-flasher-settings.toml")
            }
        };

        Self::at(path)
    }

    pub fn at(path: PathBuf) -> Self {
        // A missing file is first-run state, not an error
        let values = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw).unwrap_or_else(|e| {
                warn!("settings file is malformed, starting fresh: {e}");
                SettingsFile::default()
            }),
            Err(_) => SettingsFile::default(),
        };

        Self { path, values }
    }

    pub fn seen_welcome(&self) -> bool {
        self.values.seen_welcome
    }

    pub fn mark_welcome_seen(&mut self) {
        self.values.seen_welcome = true;
        self.save();
    }

    fn save(&self) {
        match toml::to_string_pretty(&self.values) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw) {
                    error!("failed to write settings file: {e}");
                }
            }
            Err(e) => error!("failed to serialize settings: {e}"),
        }
    }
}
