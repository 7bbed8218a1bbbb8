//! zkb - ordered-line outline store
//!
//! An outline is a directory tree: every line is a directory named
//! `"<key> <label>"`, nested lines are subdirectories, and keys within a
//! directory are kept dense (`1..=count`) under every edit.
//!
//! Modules:
//! - models: order-key codec, ranges, cursor, commands, undo/redo history
//! - services: filesystem provider (single-entry primitives)
//! - store: line store, staged rename plans, crash journal
//! - session: one editing session over a root
//! - cli: interactive command syntax

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod paths;
pub mod services;
pub mod session;
pub mod store;
pub mod workspace;

pub use error::{Result, StoreError};
pub use session::Session;
