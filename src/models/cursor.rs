//! Implicit default position for commands that omit one.
//!
//! The cursor lives in `[1, count + 1]`; `count + 1` is the append position.

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    line: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self { line: 1 }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn set(&mut self, line: usize, count: usize) -> Result<()> {
        if line == 0 || line > count + 1 {
            return Err(StoreError::NonExistentLine { line, count });
        }
        self.line = line;
        Ok(())
    }

    pub fn clamp(&mut self, count: usize) {
        self.line = self.line.clamp(1, count + 1);
    }

    pub fn is_append(&self, count: usize) -> bool {
        self.line > count
    }

    /// Line a delete or rename without an explicit position acts on: the
    /// cursor line, or the last line while the cursor sits at append.
    pub fn existing_line(&self, count: usize) -> Option<usize> {
        match count {
            0 => None,
            _ if !self.is_append(count) => Some(self.line),
            _ => Some(count),
        }
    }

    /// Keeps typing order: the next insert lands below the one just made.
    pub fn after_insert(&mut self, at: usize, count: usize) {
        self.line = at + 1;
        self.clamp(count);
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/cursor.rs"]
mod tests;
