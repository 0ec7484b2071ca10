//! User settings stored as settings.json in the app data directory

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Last directory a report was exported to
    pub export_dir: Option<String>,

    // Open the exported PDF after saving
    pub open_after_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            export_dir: None,
            open_after_export: true,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn export_dir_or_default(&self) -> PathBuf {
        self.export_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::document_dir()
                    .or_else(dirs::home_dir)
                    .unwrap_or_else(|| PathBuf::from("."))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let dir = std::env::temp_dir().join("radiology-analyzer-test-corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("settings.json"), "{not json").unwrap();
        let settings = Settings::load(&dir);
        assert!(settings.export_dir.is_none());
        assert!(settings.open_after_export);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn settings_round_trip() {
        let dir = std::env::temp_dir().join("radiology-analyzer-test-roundtrip");
        std::fs::create_dir_all(&dir).unwrap();
        let settings = Settings {
            window_w: Some(1200.0),
            export_dir: Some("/tmp/reports".into()),
            open_after_export: false,
            ..Default::default()
        };
        settings.save(&dir);
        let loaded = Settings::load(&dir);
        assert_eq!(loaded.window_w, Some(1200.0));
        assert_eq!(loaded.export_dir.as_deref(), Some("/tmp/reports"));
        assert!(!loaded.open_after_export);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = std::env::temp_dir().join("radiology-analyzer-test-missing");
        std::fs::remove_dir_all(&dir).ok();
        let settings = Settings::load(&dir);
        assert!(settings.window_x.is_none());
    }
}
