//! Undo/redo history.
//!
//! Two stacks of inverse commands:
//! - a mutation pushes its inverse onto the undo stack and clears redo
//! - replaying an undo record yields the forward commands, kept on redo
//! - replaying a redo record yields inverses again, kept on undo
//!
//! The undo stack is bounded; the oldest record falls off first.

use super::command::Command;
use std::collections::VecDeque;
use std::path::PathBuf;

pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Inverse commands of one completed mutation and the container they apply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Replayed front to back.
    pub inverse: Vec<Command>,
    pub context: PathBuf,
}

impl HistoryRecord {
    pub fn new(inverse: Vec<Command>, context: PathBuf) -> Self {
        Self { inverse, context }
    }

    pub fn is_empty(&self) -> bool {
        self.inverse.is_empty()
    }
}

pub struct History {
    undo: VecDeque<HistoryRecord>,
    redo: Vec<HistoryRecord>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Records a fresh mutation; any redo branch is discarded.
    pub fn push(&mut self, record: HistoryRecord) {
        if record.is_empty() {
            return;
        }
        self.redo.clear();
        self.push_undo(record);
    }

    pub fn pop_undo(&mut self) -> Option<HistoryRecord> {
        self.undo.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryRecord> {
        self.redo.pop()
    }

    /// Keeps the redo stack intact (used when a redo produces new inverses,
    /// or when a failed undo puts its record back).
    pub fn push_undo(&mut self, record: HistoryRecord) {
        if record.is_empty() {
            return;
        }
        self.undo.push_back(record);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    pub fn push_redo(&mut self, record: HistoryRecord) {
        if record.is_empty() {
            return;
        }
        self.redo.push(record);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Most recent first.
    pub fn log(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.undo.iter().rev()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/history.rs"]
mod tests;
