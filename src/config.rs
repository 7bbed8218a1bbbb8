//! Per-outline settings, read from `<root>/.zkb/settings.json`.

use crate::models::history::DEFAULT_HISTORY_LIMIT;
use crate::paths;
use crate::services::file::{FileError, FileProvider};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BLANK_LABEL: &str = "'...'";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Label for lines created without one, and for blanks a confirmed move adds.
    pub blank_label: String,
    pub history_limit: usize,
    /// Persist rename schedules so an interrupted renumbering can be finished.
    pub journal: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blank_label: DEFAULT_BLANK_LABEL.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            journal: true,
        }
    }
}

impl Settings {
    /// Missing file means defaults; an unreadable or invalid one is logged
    /// and also falls back to defaults.
    pub fn load(provider: &dyn FileProvider, root: &Path) -> Self {
        let path = paths::settings_path(root);
        let data = match provider.read_file(&path) {
            Ok(data) => data,
            Err(FileError::NotFound(_)) => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read settings");
                return Self::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, provider: &dyn FileProvider, root: &Path) -> crate::services::file::Result<()> {
        provider.create_dir_all(&paths::state_dir(root))?;
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FileError::Io(std::io::Error::other(e)))?;
        provider.write_file_atomic(&paths::settings_path(root), &content)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
