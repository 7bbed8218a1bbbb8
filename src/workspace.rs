//! Root container discovery and exclusive access.
//!
//! The root container is the nearest directory (the start directory or
//! one of its ancestors) whose name ends in `.zkb`. Sub-containers are
//! plain line directories below it.

use crate::error::{Result, StoreError};
use crate::paths;
use crate::services::file::{FileError, FileProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ROOT_SUFFIX: &str = ".zkb";

pub fn is_root_name(name: &str) -> bool {
    name.len() > ROOT_SUFFIX.len() && name.ends_with(ROOT_SUFFIX)
}

pub fn find_root(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            dir.file_name()
                .map(|name| is_root_name(&name.to_string_lossy()))
                .unwrap_or(false)
        })
        .map(Path::to_path_buf)
        .ok_or_else(|| StoreError::RootNotFound(start.to_path_buf()))
}

/// Held for the lifetime of a session; a second session on the same root
/// fails with [`StoreError::Locked`]. Dropping the guard releases it.
///
/// The lock file holds the owner's process id. A lock whose owner is no
/// longer running is taken over, so a killed session does not keep the
/// root (and its crash journal) closed.
pub struct RootLock {
    path: PathBuf,
    provider: Arc<dyn FileProvider>,
}

impl RootLock {
    pub fn acquire(provider: Arc<dyn FileProvider>, root: &Path) -> Result<Self> {
        provider.create_dir_all(&paths::state_dir(root))?;
        let path = paths::lock_path(root);
        let content = format!("{}\n", std::process::id());
        match provider.create_file_exclusive(&path, &content) {
            Ok(()) => {}
            Err(FileError::AlreadyExists(_)) => {
                let owner = provider
                    .read_file(&path)
                    .ok()
                    .and_then(|text| text.trim().parse::<u32>().ok());
                if owner.map_or(false, process_alive) {
                    return Err(StoreError::Locked(root.to_path_buf()));
                }
                tracing::warn!(path = %path.display(), owner = ?owner, "removing stale root lock");
                match provider.delete_file(&path) {
                    Ok(()) | Err(FileError::NotFound(_)) => {}
                    Err(e) => return Err(e.into()),
                }
                match provider.create_file_exclusive(&path, &content) {
                    Ok(()) => {}
                    Err(FileError::AlreadyExists(_)) => {
                        return Err(StoreError::Locked(root.to_path_buf()))
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Err(e) => return Err(e.into()),
        }
        tracing::debug!(path = %path.display(), "root locked");
        Ok(Self { path, provider })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RootLock {
    fn drop(&mut self) {
        if let Err(e) = self.provider.delete_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release root lock");
        }
    }
}

/// Signal 0 only checks that `pid` names a process we could signal.
#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    if pid <= 0 {
        return false;
    }
    // SAFETY: kill with signal 0 performs no action beyond the permission check.
    if unsafe { libc::kill(pid, 0) } == 0 {
        return true;
    }
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

#[cfg(test)]
#[path = "../tests/unit/workspace.rs"]
mod tests;
