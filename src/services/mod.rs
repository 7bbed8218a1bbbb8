//! Service layer: OS-facing implementations the store is built on.

pub mod file;

pub use file::{DirEntry, FileError, FileProvider, LocalFileProvider};
