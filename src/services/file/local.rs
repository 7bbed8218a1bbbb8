//! Local filesystem provider.

use super::provider::{DirEntry, FileError, FileProvider, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

pub struct LocalFileProvider;

impl LocalFileProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FileProvider for LocalFileProvider {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        if !path.is_dir() {
            return Err(FileError::NotADirectory(path.to_path_buf()));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let file_type = entry.file_type()?;

            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path(),
                is_dir: file_type.is_dir(),
                is_file: file_type.is_file(),
                is_symlink: file_type.is_symlink(),
            });
        }

        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn write_file_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| FileError::NotFound(path.to_path_buf()))?;
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| FileError::Io(e.error))?;
        Ok(())
    }

    fn append_file(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(content.as_bytes())?;
        file.sync_data()?;
        Ok(())
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(FileError::AlreadyExists(path.to_path_buf()));
        }
        Ok(fs::create_dir(path)?)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        Ok(fs::create_dir_all(path)?)
    }

    fn create_file_exclusive(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(FileError::AlreadyExists(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        Ok(fs::remove_file(path)?)
    }

    fn delete_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FileError::NotADirectory(path.to_path_buf()));
        }
        Ok(fs::remove_dir(path)?)
    }

    fn delete_dir_all(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FileError::NotADirectory(path.to_path_buf()));
        }
        Ok(fs::remove_dir_all(path)?)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.exists() {
            return Err(FileError::NotFound(from.to_path_buf()));
        }
        if to.exists() {
            return Err(FileError::AlreadyExists(to.to_path_buf()));
        }
        Ok(fs::rename(from, to)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/services/file/local.rs"]
mod tests;
