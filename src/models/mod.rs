//! Data models

pub mod command;
pub mod cursor;
pub mod history;
pub mod order_key;
pub mod range;

pub use command::Command;
pub use cursor::Cursor;
pub use history::{History, HistoryRecord, DEFAULT_HISTORY_LIMIT};
pub use order_key::{MalformedName, OrderKey};
pub use range::{LineRange, Target};
