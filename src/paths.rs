//! Filesystem locations.
//!
//! Per-user data (logs) follows the platform convention:
//! - macOS: ~/Library/Application Support/zkb
//! - Linux: $XDG_DATA_HOME/zkb or ~/.local/share/zkb
//! - Windows: %APPDATA%\zkb
//!
//! Per-outline state lives in a hidden `.zkb/` directory directly under the
//! root container, so it is never mistaken for a line.

use std::path::{Path, PathBuf};

const APP_NAME: &str = "zkb";
const LOG_DIR: &str = "logs";

pub const STATE_DIR: &str = ".zkb";
const SETTINGS_FILE: &str = "settings.json";
const JOURNAL_FILE: &str = "journal";
const LOCK_FILE: &str = "lock";

fn get_app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join("Library/Application Support")
                .join(APP_NAME)
        })
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            Some(PathBuf::from(xdg).join(APP_NAME))
        } else {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".local/share").join(APP_NAME))
        }
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(LOG_DIR))
}

/// Creates the log directory, falling back to the temp dir when no data dir
/// can be determined or created.
pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let preferred = get_log_dir().filter(|dir| std::fs::create_dir_all(dir).is_ok());
    if let Some(dir) = preferred {
        return Ok(dir);
    }

    let dir = std::env::temp_dir().join(APP_NAME).join(LOG_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn state_dir(root: &Path) -> PathBuf {
    root.join(STATE_DIR)
}

pub fn settings_path(root: &Path) -> PathBuf {
    state_dir(root).join(SETTINGS_FILE)
}

pub fn journal_path(root: &Path) -> PathBuf {
    state_dir(root).join(JOURNAL_FILE)
}

pub fn lock_path(root: &Path) -> PathBuf {
    state_dir(root).join(LOCK_FILE)
}

#[cfg(test)]
#[path = "../tests/unit/paths.rs"]
mod tests;
