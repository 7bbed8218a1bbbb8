//! Replayable structural edits.
//!
//! Every position here is already resolved against the container it was
//! recorded in; history records store these as inverse commands.

use super::range::LineRange;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Insert { at: usize, label: CompactString },
    Delete { range: LineRange, force: bool },
    Rename { range: LineRange, label: CompactString },
    Move { range: LineRange, to: usize },
    Swap { a: usize, b: usize },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert { .. } => "insert",
            Command::Delete { .. } => "delete",
            Command::Rename { .. } => "rename",
            Command::Move { .. } => "move",
            Command::Swap { .. } => "swap",
        }
    }
}

fn write_range(f: &mut fmt::Formatter<'_>, range: &LineRange) -> fmt::Result {
    if range.is_point() {
        write!(f, "{}", range.lower)
    } else {
        write!(f, "({},{})", range.lower, range.upper)
    }
}

/// Renders in the interactive command syntax.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Insert { at, label } => write!(f, "line {:?} {}", label.as_str(), at),
            Command::Delete { range, force } => {
                write!(f, "{}delete ", if *force { "-" } else { "" })?;
                write_range(f, range)
            }
            Command::Rename { range, label } => {
                write!(f, "change {:?} ", label.as_str())?;
                write_range(f, range)
            }
            Command::Move { range, to } => {
                write!(f, "move ")?;
                write_range(f, range)?;
                write!(f, " {}", to)
            }
            Command::Swap { a, b } => write!(f, "swap {} {}", a, b),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/command.rs"]
mod tests;
