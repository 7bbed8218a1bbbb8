//! Filesystem abstraction used by the line store.

pub mod local;
pub mod provider;

pub use local::LocalFileProvider;
pub use provider::{DirEntry, FileError, FileProvider, Result};
