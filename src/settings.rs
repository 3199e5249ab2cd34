//! Persistent settings for the dashboard app.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All persistable UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Header theme toggle state
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,

    /// Graph label toggle state
    #[serde(default)]
    pub show_labels: bool,

    /// Origin of the analysis backend
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_dark_mode() -> bool {
    true
}

fn default_api_base() -> String {
    "http://localhost:6969".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_labels: false,
            api_base: default_api_base(),
        }
    }
}

impl Settings {
    /// Get the path to the settings file
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("thoughtflow");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from disk, returning defaults if file doesn't exist or is invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            eprintln!("Could not determine config directory, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    eprintln!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    eprintln!("Failed to parse settings file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist yet, that's fine
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            eprintln!("Could not determine config directory, settings not saved");
            return;
        };

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Failed to create config directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    eprintln!("Failed to write settings file: {}", e);
                } else {
                    eprintln!("Saved settings to {:?}", path);
                }
            }
            Err(e) => {
                eprintln!("Failed to serialize settings: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert!(settings.dark_mode);
        assert!(!settings.show_labels);
        assert_eq!(settings.api_base, "http://localhost:6969");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let settings: Settings =
            serde_json::from_str(r#"{"dark_mode": false, "node_size": 15.0}"#).unwrap();
        assert!(!settings.dark_mode);
    }
}
