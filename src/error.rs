//! Error taxonomy shared by the codec, range parser, store and session.

use crate::models::order_key::MalformedName;
use crate::services::file::FileError;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("malformed line name: {0:?}")]
    MalformedName(String),
    #[error("line {line} is non-existent (container has {count} lines)")]
    NonExistentLine { line: usize, count: usize },
    #[error("range ({lower},{upper}) is invalid (container has {count} lines)")]
    InvalidRange {
        lower: usize,
        upper: usize,
        count: usize,
    },
    #[error("malformed range: {0:?}")]
    MalformedRange(String),
    #[error("line {line} is not empty; force the command to delete it")]
    NotEmpty { line: usize },
    #[error("name collision on {0:?}")]
    NameCollision(String),
    #[error("invalid label: {0:?}")]
    InvalidLabel(String),
    #[error("no changes to undo")]
    NoHistory,
    #[error("no changes to redo")]
    NoRedo,
    #[error("{} is locked by another session", .0.display())]
    Locked(PathBuf),
    #[error("no root container (a directory ending in .zkb) above {}", .0.display())]
    RootNotFound(PathBuf),
    #[error("journal error: {0}")]
    Journal(String),
    #[error(transparent)]
    Filesystem(#[from] FileError),
}

impl From<MalformedName> for StoreError {
    fn from(e: MalformedName) -> Self {
        StoreError::MalformedName(e.0)
    }
}
