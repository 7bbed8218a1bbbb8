//! Filesystem provider trait.
//!
//! The line store only ever needs single-entry primitives: create one
//! directory, rename one entry, remove one entry (or one subtree). Nothing
//! here is transactional; multi-step consistency is the store's job.

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, FileError>;

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),
}

#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    pub is_file: bool,
    pub is_symlink: bool,
}

impl DirEntry {
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path,
            name,
            is_dir,
            is_file: !is_dir,
            is_symlink: false,
        }
    }

    /// Dot-prefixed names are engine state (`.zkb`, scratch names), never lines.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

pub trait FileProvider: Send + Sync {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    fn read_file(&self, path: &Path) -> Result<String>;

    /// Replaces `path` in one step (write to a sibling temp file, then rename).
    fn write_file_atomic(&self, path: &Path, content: &str) -> Result<()>;

    /// Appends to `path`, creating it if needed.
    fn append_file(&self, path: &Path, content: &str) -> Result<()>;

    fn create_dir(&self, path: &Path) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Creates `path` as a new file, failing if it already exists.
    fn create_file_exclusive(&self, path: &Path, content: &str) -> Result<()>;

    fn delete_file(&self, path: &Path) -> Result<()>;

    fn delete_dir(&self, path: &Path) -> Result<()>;

    fn delete_dir_all(&self, path: &Path) -> Result<()>;

    /// Never overwrites: an occupied `to` is `AlreadyExists`.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_empty_dir(&self, path: &Path) -> Result<bool> {
        Ok(self.read_dir(path)?.is_empty())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/services/file/provider.rs"]
mod tests;
