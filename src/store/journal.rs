//! In-flight rename journal.
//!
//! Line format (append-only):
//! - line 1: JSON header with the container and the full rename schedule
//! - then one `DONE=<index>` line per completed rename
//!
//! A journal left behind by a crash is rolled back on the next open, which
//! restores the container as it was before the interrupted command. The
//! step after the last `DONE` line may or may not have happened, so every
//! step is only reversed if its destination exists and its source does not.

use super::plan::RenameStep;
use crate::error::{Result, StoreError};
use crate::services::file::FileProvider;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DONE_PREFIX: &str = "DONE=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalHeader {
    pub container: PathBuf,
    pub steps: Vec<RenameStep>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingJournal {
    pub header: JournalHeader,
    /// Number of steps known to be complete.
    pub done: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    pub container: PathBuf,
    pub reverted: usize,
    pub skipped: usize,
}

pub struct Journal {
    path: PathBuf,
    provider: Arc<dyn FileProvider>,
}

impl Journal {
    pub fn new(path: PathBuf, provider: Arc<dyn FileProvider>) -> Self {
        Self { path, provider }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn begin(&self, container: &Path, steps: &[RenameStep]) -> Result<()> {
        let header = JournalHeader {
            container: container.to_path_buf(),
            steps: steps.to_vec(),
        };
        let line = serde_json::to_string(&header).map_err(|e| StoreError::Journal(e.to_string()))?;
        self.provider
            .write_file_atomic(&self.path, &format!("{}\n", line))?;
        Ok(())
    }

    pub fn mark_done(&self, index: usize) -> Result<()> {
        self.provider
            .append_file(&self.path, &format!("{}{}\n", DONE_PREFIX, index))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.provider.exists(&self.path) {
            self.provider.delete_file(&self.path)?;
        }
        Ok(())
    }

    pub fn pending(&self) -> Result<Option<PendingJournal>> {
        if !self.provider.exists(&self.path) {
            return Ok(None);
        }

        let content = self.provider.read_file(&self.path)?;
        let mut lines = content.lines();
        let Some(first) = lines.next() else {
            return Ok(None);
        };
        let header: JournalHeader =
            serde_json::from_str(first).map_err(|e| StoreError::Journal(e.to_string()))?;

        let mut done = 0;
        for line in lines {
            // A torn final line is possible after a crash; ignore it.
            if let Some(index) = line
                .strip_prefix(DONE_PREFIX)
                .and_then(|n| n.trim().parse::<usize>().ok())
            {
                done = done.max(index + 1);
            }
        }

        Ok(Some(PendingJournal { header, done }))
    }

    /// Reverts an interrupted schedule and removes the journal.
    pub fn recover(&self) -> Result<Option<RecoveryReport>> {
        let Some(pending) = self.pending()? else {
            return Ok(None);
        };

        let container = &pending.header.container;
        let mut report = RecoveryReport {
            container: container.clone(),
            ..RecoveryReport::default()
        };

        let attempted = (pending.done + 1).min(pending.header.steps.len());
        for step in pending.header.steps[..attempted].iter().rev() {
            let from = container.join(step.from.as_str());
            let to = container.join(step.to.as_str());
            if self.provider.exists(&to) && !self.provider.exists(&from) {
                self.provider.rename(&to, &from)?;
                report.reverted += 1;
            } else {
                tracing::warn!(from = %step.from, to = %step.to, "journal step skipped");
                report.skipped += 1;
            }
        }

        self.clear()?;
        tracing::info!(
            container = %container.display(),
            reverted = report.reverted,
            skipped = report.skipped,
            "rolled back interrupted renumbering"
        );
        Ok(Some(report))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/journal.rs"]
mod tests;
