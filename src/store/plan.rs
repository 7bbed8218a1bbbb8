//! Staged multi-rename.
//!
//! The backing store renames one entry at a time and refuses to overwrite,
//! so a renumbering is planned as a whole first:
//! 1. validate the mapping (unique sources and destinations, no destination
//!    held by an entry that is not itself moving)
//! 2. simulate it in order; a step whose destination is still occupied is
//!    detoured through a hidden scratch name and finished after all others
//! 3. run the resulting schedule, undoing completed steps if one fails

use super::journal::Journal;
use crate::error::{Result, StoreError};
use crate::models::order_key::{self, SCRATCH_PREFIX};
use crate::services::file::FileProvider;
use compact_str::{format_compact, CompactString};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::entry::Entry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameStep {
    pub from: CompactString,
    pub to: CompactString,
}

impl RenameStep {
    pub fn new(from: impl Into<CompactString>, to: impl Into<CompactString>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    pub fn inverted(&self) -> Self {
        Self::new(self.to.clone(), self.from.clone())
    }
}

#[derive(Debug, Clone)]
pub struct RenamePlan {
    container: PathBuf,
    steps: Vec<RenameStep>,
}

impl RenamePlan {
    pub fn new(container: &Path) -> Self {
        Self {
            container: container.to_path_buf(),
            steps: Vec::new(),
        }
    }

    pub fn container(&self) -> &Path {
        &self.container
    }

    pub fn steps(&self) -> &[RenameStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.iter().all(RenameStep::is_noop)
    }

    /// The renumbering primitive every structural edit is built from.
    pub fn set_key(&mut self, entry: &Entry, key: usize) {
        let target = entry.order_key().with_key(key);
        self.steps.push(RenameStep::new(entry.name(), target.format()));
    }

    pub fn relabel(&mut self, entry: &Entry, label: &str) {
        self.steps
            .push(RenameStep::new(entry.name(), order_key::format(entry.key, label)));
    }

    /// Moves an entry out of the visible sequence ahead of its removal.
    pub fn hide(&mut self, entry: &Entry) -> CompactString {
        let hidden = entry.order_key().scratch_name();
        self.steps.push(RenameStep::new(entry.name(), hidden.clone()));
        hidden
    }

    /// Orders the steps into single renames, detouring collisions.
    ///
    /// `existing` must hold every child name of the container, hidden ones
    /// included, so scratch names never clash with leftovers.
    pub fn schedule(&self, existing: &FxHashSet<CompactString>) -> Result<Vec<RenameStep>> {
        let steps: Vec<&RenameStep> = self.steps.iter().filter(|s| !s.is_noop()).collect();

        let mut sources = FxHashSet::default();
        let mut destinations = FxHashSet::default();
        for step in &steps {
            if !existing.contains(&step.from) || !sources.insert(step.from.clone()) {
                return Err(StoreError::NameCollision(step.from.to_string()));
            }
            if !destinations.insert(step.to.clone()) {
                return Err(StoreError::NameCollision(step.to.to_string()));
            }
        }
        for step in &steps {
            if existing.contains(&step.to) && !sources.contains(&step.to) {
                return Err(StoreError::NameCollision(step.to.to_string()));
            }
        }

        let mut occupied = existing.clone();
        let mut schedule = Vec::with_capacity(steps.len());
        let mut deferred = Vec::new();

        for step in steps {
            occupied.remove(&step.from);
            if occupied.contains(&step.to) {
                let scratch = scratch_for(&step.from, &occupied);
                tracing::debug!(from = %step.from, to = %step.to, scratch = %scratch, "detour");
                occupied.insert(scratch.clone());
                schedule.push(RenameStep::new(step.from.clone(), scratch.clone()));
                deferred.push(RenameStep::new(scratch, step.to.clone()));
            } else {
                occupied.insert(step.to.clone());
                schedule.push(step.clone());
            }
        }

        for step in &deferred {
            occupied.remove(&step.from);
            if !occupied.insert(step.to.clone()) {
                return Err(StoreError::NameCollision(step.to.to_string()));
            }
        }
        schedule.extend(deferred);

        Ok(schedule)
    }

    pub fn execute(
        &self,
        provider: &dyn FileProvider,
        existing: &FxHashSet<CompactString>,
        journal: Option<&Journal>,
    ) -> Result<Vec<RenameStep>> {
        let schedule = self.schedule(existing)?;
        run_schedule(provider, &self.container, &schedule, journal)?;
        Ok(schedule)
    }
}

fn scratch_for(name: &str, occupied: &FxHashSet<CompactString>) -> CompactString {
    let mut scratch = format_compact!("{}{}", SCRATCH_PREFIX, name);
    let mut n = 1;
    while occupied.contains(&scratch) {
        scratch = format_compact!("{}{}~{}", SCRATCH_PREFIX, name, n);
        n += 1;
    }
    scratch
}

/// Runs `schedule` in order. On failure every completed rename is reversed;
/// the journal survives only if that reversal also fails.
pub fn run_schedule(
    provider: &dyn FileProvider,
    container: &Path,
    schedule: &[RenameStep],
    journal: Option<&Journal>,
) -> Result<()> {
    if schedule.is_empty() {
        return Ok(());
    }
    if let Some(journal) = journal {
        journal.begin(container, schedule)?;
    }

    for (i, step) in schedule.iter().enumerate() {
        let result = provider
            .rename(&container.join(step.from.as_str()), &container.join(step.to.as_str()))
            .map_err(StoreError::from)
            .and_then(|()| match journal {
                Some(journal) => journal.mark_done(i),
                None => Ok(()),
            });

        if let Err(err) = result {
            tracing::warn!(
                container = %container.display(),
                from = %step.from,
                to = %step.to,
                error = %err,
                "rename failed, rolling back"
            );
            let rolled_back = rollback(provider, container, &schedule[..i]);
            if rolled_back {
                if let Some(journal) = journal {
                    journal.clear()?;
                }
            }
            return Err(err);
        }
    }

    if let Some(journal) = journal {
        journal.clear()?;
    }
    Ok(())
}

fn rollback(provider: &dyn FileProvider, container: &Path, done: &[RenameStep]) -> bool {
    let mut clean = true;
    for step in done.iter().rev() {
        let back = step.inverted();
        if let Err(e) = provider.rename(
            &container.join(back.from.as_str()),
            &container.join(back.to.as_str()),
        ) {
            tracing::error!(
                container = %container.display(),
                from = %back.from,
                to = %back.to,
                error = %e,
                "rollback rename failed"
            );
            clean = false;
        }
    }
    clean
}

#[cfg(test)]
#[path = "../../tests/unit/store/plan.rs"]
mod tests;
