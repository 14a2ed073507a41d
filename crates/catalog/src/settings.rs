use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sources::write_json_atomic;

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Preferred install method: `copy` or `cli`.
    pub install_method: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            install_method: "copy".to_string(),
        }
    }
}

/// Persistent settings storage.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Settings {
        if !self.path.exists() {
            return Settings::default();
        }
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, settings: &Settings) -> anyhow::Result<()> {
        write_json_atomic(&self.path, settings)
    }
}
