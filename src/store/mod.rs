//! Ordered line store.
//!
//! A container is a directory whose visible subdirectories are its lines,
//! each named `"<key> <label>"`. Keys in a container are always exactly
//! `1..=count`. The filesystem is the only source of truth; the store keeps
//! nothing but a per-container count cache.
//!
//! Every structural edit follows the same shape:
//! - scan and validate (no side effects on failure)
//! - build a [`RenamePlan`] out of `set_key`/`relabel`/`hide` steps
//! - commit it through the plan's detour-aware schedule
//! - create or purge directories that fall outside renames

mod entry;
pub mod journal;
pub mod plan;

pub use crate::error::{Result, StoreError};
pub use entry::{Entry, EntryInfo};
pub use journal::{Journal, RecoveryReport};
pub use plan::{RenamePlan, RenameStep};

use crate::models::order_key::{self, OrderKey};
use crate::models::range::LineRange;
use crate::services::file::FileProvider;
use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a rename takes its new label from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSource {
    Text(CompactString),
    /// Copy the label currently on this line.
    Line(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Unchanged,
    /// `created` lists blank lines added to make room, by final key before the move.
    Moved { created: Vec<Entry> },
    /// The block would end past the last line; re-run with an extension label
    /// to create blank lines up to `required`.
    NeedsConfirmation { count: usize, required: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DensityReport {
    pub count: usize,
    pub duplicates: Vec<usize>,
    pub missing: Vec<usize>,
    /// Scratch names left behind by an interrupted plan. They are hidden and
    /// do not affect density.
    pub leftovers: Vec<CompactString>,
}

impl DensityReport {
    pub fn is_dense(&self) -> bool {
        self.duplicates.is_empty() && self.missing.is_empty()
    }
}

struct Scan {
    /// Ascending by key.
    entries: Vec<Entry>,
    /// Every child name, hidden and non-directory ones included.
    names: FxHashSet<CompactString>,
}

impl Scan {
    fn find(&self, key: usize) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    fn in_range(&self, range: LineRange) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|e| range.contains(e.key))
            .cloned()
            .collect()
    }
}

pub struct LineStore {
    provider: Arc<dyn FileProvider>,
    journal: Option<Journal>,
    counts: FxHashMap<PathBuf, usize>,
}

impl LineStore {
    pub fn new(provider: Arc<dyn FileProvider>) -> Self {
        Self {
            provider,
            journal: None,
            counts: FxHashMap::default(),
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn provider(&self) -> &dyn FileProvider {
        self.provider.as_ref()
    }

    pub fn journal(&self) -> Option<&Journal> {
        self.journal.as_ref()
    }

    // ==================== Queries ====================

    /// Cached; a miss costs one directory scan.
    pub fn count(&mut self, container: &Path) -> Result<usize> {
        if let Some(&count) = self.counts.get(container) {
            return Ok(count);
        }
        Ok(self.scan(container)?.entries.len())
    }

    /// Drops cached counts for `container` and everything below it, since
    /// renames there change the paths of nested containers too.
    pub fn invalidate(&mut self, container: &Path) {
        self.counts.retain(|path, _| !path.starts_with(container));
    }

    pub fn entries(&mut self, container: &Path) -> Result<Vec<Entry>> {
        Ok(self.scan(container)?.entries)
    }

    pub fn entry_at(&mut self, container: &Path, key: usize) -> Result<Entry> {
        let scan = self.scan(container)?;
        let count = scan.entries.len();
        scan.find(key)
            .cloned()
            .ok_or(StoreError::NonExistentLine { line: key, count })
    }

    pub fn entries_in_range(&mut self, container: &Path, range: LineRange) -> Result<Vec<Entry>> {
        let scan = self.scan(container)?;
        let range = range.validate(scan.entries.len())?;
        Ok(scan.in_range(range))
    }

    pub fn info(&mut self, container: &Path, key: usize) -> Result<EntryInfo> {
        let entry = self.entry_at(container, key)?;
        let children = self.count(&entry.path)?;
        Ok(EntryInfo {
            key: entry.key,
            label: entry.label,
            children,
        })
    }

    /// Reports duplicate and missing keys; a healthy container is dense.
    pub fn verify(&mut self, container: &Path) -> Result<DensityReport> {
        let scan = self.scan(container)?;
        let count = scan.entries.len();

        let mut seen: FxHashMap<usize, usize> = FxHashMap::default();
        for entry in &scan.entries {
            *seen.entry(entry.key).or_default() += 1;
        }

        let mut duplicates: Vec<usize> = seen
            .iter()
            .filter(|&(_, &n)| n > 1)
            .map(|(&key, _)| key)
            .collect();
        duplicates.sort_unstable();
        let missing = (1..=count).filter(|k| !seen.contains_key(k)).collect();
        let mut leftovers: Vec<CompactString> = scan
            .names
            .iter()
            .filter(|name| order_key::is_scratch_name(name))
            .cloned()
            .collect();
        leftovers.sort();

        Ok(DensityReport {
            count,
            duplicates,
            missing,
            leftovers,
        })
    }

    // ==================== Mutations ====================

    /// Shifts lines `at..` up by one, highest first, then creates the new line.
    pub fn insert(&mut self, container: &Path, at: usize, label: &str) -> Result<Entry> {
        if !order_key::validate_label(label) {
            return Err(StoreError::InvalidLabel(label.to_string()));
        }
        let scan = self.scan(container)?;
        let count = scan.entries.len();
        if at == 0 || at > count + 1 {
            return Err(StoreError::NonExistentLine { line: at, count });
        }

        let mut plan = RenamePlan::new(container);
        for entry in scan.entries.iter().rev().filter(|e| e.key >= at) {
            plan.set_key(entry, entry.key + 1);
        }
        let schedule = self.commit(&plan, &scan.names)?;

        let created = Entry::from_order_key(container, OrderKey::new(at, label));
        if let Err(e) = self.provider.create_dir(&created.path) {
            self.revert(container, &schedule);
            self.invalidate(container);
            return Err(e.into());
        }
        self.invalidate(container);

        tracing::debug!(container = %container.display(), at, label, "insert");
        Ok(created)
    }

    /// Removes `range` and closes the gap, lowest first. Returns the removed
    /// lines as they were.
    pub fn delete(&mut self, container: &Path, range: LineRange, force: bool) -> Result<Vec<Entry>> {
        let mut scan = self.scan(container)?;
        let count = scan.entries.len();
        let range = check_target(range, count)?;
        let targets = scan.in_range(range);

        if !force {
            for target in &targets {
                if self.has_children(&target.path)? {
                    return Err(StoreError::NotEmpty { line: target.key });
                }
            }
        }

        // Scratch names left by an interrupted purge would block hiding.
        let leftovers: Vec<CompactString> = scan
            .names
            .iter()
            .filter(|name| order_key::is_scratch_name(name))
            .cloned()
            .collect();
        for name in leftovers {
            self.purge_subtree(&container.join(name.as_str()))?;
            scan.names.remove(&name);
        }

        let width = range.width();
        let mut plan = RenamePlan::new(container);
        let hidden: Vec<CompactString> = targets.iter().map(|t| plan.hide(t)).collect();
        for entry in scan.entries.iter().filter(|e| e.key > range.upper) {
            plan.set_key(entry, entry.key - width);
        }
        self.commit(&plan, &scan.names)?;
        self.invalidate(container);

        // The lines are already gone from the sequence; a failed purge only
        // leaves a hidden leftover for the next delete to clear.
        for name in hidden {
            let path = container.join(name.as_str());
            if let Err(e) = self.purge_subtree(&path) {
                tracing::warn!(path = %path.display(), error = %e, "purge failed");
            }
        }

        tracing::debug!(
            container = %container.display(),
            lower = range.lower,
            upper = range.upper,
            force,
            "delete"
        );
        Ok(targets)
    }

    /// Relocates the block `range` so that its first line lands on `to`.
    ///
    /// Lines between the old and new position close ranks in the opposite
    /// direction. If the block would end past the last line, `extension`
    /// must name the label for the blank lines that fill the gap; without
    /// it the call returns [`MoveOutcome::NeedsConfirmation`] untouched.
    pub fn move_block(
        &mut self,
        container: &Path,
        range: LineRange,
        to: usize,
        extension: Option<&str>,
    ) -> Result<MoveOutcome> {
        let mut scan = self.scan(container)?;
        let count = scan.entries.len();
        let range = check_target(range, count)?;
        if to == 0 {
            return Err(StoreError::NonExistentLine { line: to, count });
        }
        if to == range.lower {
            return Ok(MoveOutcome::Unchanged);
        }

        let width = range.width();
        let Some(required) = to.checked_add(width - 1) else {
            return Err(StoreError::NonExistentLine { line: to, count });
        };
        let mut created = Vec::new();
        if required > count {
            let Some(label) = extension else {
                return Ok(MoveOutcome::NeedsConfirmation { count, required });
            };
            if !order_key::validate_label(label) {
                return Err(StoreError::InvalidLabel(label.to_string()));
            }
            for key in count + 1..=required {
                let blank = Entry::from_order_key(container, OrderKey::new(key, label));
                if let Err(e) = self.provider.create_dir(&blank.path) {
                    self.remove_blanks(&created);
                    self.invalidate(container);
                    return Err(e.into());
                }
                created.push(blank);
            }
            scan = self.scan(container)?;
        }

        let mut block: Vec<(&Entry, usize)> = Vec::new();
        let mut displaced: Vec<(&Entry, usize)> = Vec::new();
        if to > range.lower {
            let shift = to - range.lower;
            for entry in scan.entries.iter().rev().filter(|e| range.contains(e.key)) {
                block.push((entry, entry.key + shift));
            }
            let vacated = LineRange::new(range.upper + 1, range.upper + shift);
            for entry in scan.entries.iter().filter(|e| vacated.contains(e.key)) {
                displaced.push((entry, entry.key - width));
            }
        } else {
            let shift = range.lower - to;
            for entry in scan.entries.iter().filter(|e| range.contains(e.key)) {
                block.push((entry, entry.key - shift));
            }
            let vacated = LineRange::new(to, range.lower - 1);
            for entry in scan.entries.iter().rev().filter(|e| vacated.contains(e.key)) {
                displaced.push((entry, entry.key + width));
            }
        }

        // The larger group moves first so fewer destinations are still held.
        let (first, second) = if block.len() >= displaced.len() {
            (&block, &displaced)
        } else {
            (&displaced, &block)
        };
        let mut plan = RenamePlan::new(container);
        for &(entry, key) in first.iter().chain(second.iter()) {
            plan.set_key(entry, key);
        }

        if let Err(e) = self.commit(&plan, &scan.names) {
            self.remove_blanks(&created);
            self.invalidate(container);
            return Err(e);
        }
        self.invalidate(container);

        tracing::debug!(
            container = %container.display(),
            lower = range.lower,
            upper = range.upper,
            to,
            created = created.len(),
            "move"
        );
        Ok(MoveOutcome::Moved { created })
    }

    /// Exchanges two lines. Equal labels make the two target names collide,
    /// which the plan resolves with a scratch detour.
    pub fn swap(&mut self, container: &Path, a: usize, b: usize) -> Result<()> {
        let scan = self.scan(container)?;
        let count = scan.entries.len();
        let missing = |line| StoreError::NonExistentLine { line, count };
        let first = scan.find(a).ok_or_else(|| missing(a))?;
        let second = scan.find(b).ok_or_else(|| missing(b))?;
        if a == b {
            return Ok(());
        }

        let mut plan = RenamePlan::new(container);
        plan.set_key(first, b);
        plan.set_key(second, a);
        self.commit(&plan, &scan.names)?;
        self.invalidate(container);

        tracing::debug!(container = %container.display(), a, b, "swap");
        Ok(())
    }

    /// Changes labels only. Returns the lines as they were before.
    pub fn rename(
        &mut self,
        container: &Path,
        range: LineRange,
        source: &LabelSource,
    ) -> Result<Vec<Entry>> {
        let scan = self.scan(container)?;
        let count = scan.entries.len();
        let label = match source {
            LabelSource::Text(label) => label.clone(),
            LabelSource::Line(line) => scan
                .find(*line)
                .map(|e| e.label.clone())
                .ok_or(StoreError::NonExistentLine { line: *line, count })?,
        };
        if !order_key::validate_label(&label) {
            return Err(StoreError::InvalidLabel(label.to_string()));
        }
        let range = check_target(range, count)?;
        let targets = scan.in_range(range);

        let mut plan = RenamePlan::new(container);
        for target in &targets {
            plan.relabel(target, &label);
        }
        self.commit(&plan, &scan.names)?;
        self.invalidate(container);

        tracing::debug!(
            container = %container.display(),
            lower = range.lower,
            upper = range.upper,
            label = %label,
            "rename"
        );
        Ok(targets)
    }

    /// Finishes a renumbering interrupted by a crash, if the journal has one.
    pub fn recover(&mut self) -> Result<Option<RecoveryReport>> {
        let Some(journal) = &self.journal else {
            return Ok(None);
        };
        let report = journal.recover()?;
        if report.is_some() {
            self.counts.clear();
        }
        Ok(report)
    }

    // ==================== Internals ====================

    fn scan(&mut self, container: &Path) -> Result<Scan> {
        let mut entries = Vec::new();
        let mut names = FxHashSet::default();

        for child in self.provider.read_dir(container)? {
            names.insert(CompactString::from(child.name.as_str()));
            if !child.is_dir || child.is_hidden() {
                continue;
            }
            let key = OrderKey::parse(&child.name)?;
            entries.push(Entry::from_order_key(container, key));
        }
        entries.sort_by_key(|e| e.key);

        self.counts.insert(container.to_path_buf(), entries.len());
        Ok(Scan { entries, names })
    }

    fn commit(
        &mut self,
        plan: &RenamePlan,
        names: &FxHashSet<CompactString>,
    ) -> Result<Vec<RenameStep>> {
        let result = plan.execute(self.provider.as_ref(), names, self.journal.as_ref());
        if result.is_err() {
            self.invalidate(plan.container());
        }
        result
    }

    /// Plays a committed schedule backwards.
    fn revert(&self, container: &Path, schedule: &[RenameStep]) {
        let reverse: Vec<RenameStep> = schedule.iter().rev().map(RenameStep::inverted).collect();
        if let Err(e) =
            plan::run_schedule(self.provider.as_ref(), container, &reverse, self.journal.as_ref())
        {
            tracing::error!(container = %container.display(), error = %e, "revert failed");
        }
    }

    fn remove_blanks(&self, created: &[Entry]) {
        for blank in created {
            if let Err(e) = self.provider.delete_dir(&blank.path) {
                tracing::error!(path = %blank.path.display(), error = %e, "remove blank line failed");
            }
        }
    }

    fn has_children(&self, path: &Path) -> Result<bool> {
        Ok(self
            .provider
            .read_dir(path)?
            .iter()
            .any(|child| child.is_dir && !child.is_hidden()))
    }

    /// Removes a line's directory and everything nested in it. Nothing here
    /// is recorded in history.
    fn purge_subtree(&self, path: &Path) -> Result<()> {
        self.provider.delete_dir_all(path)?;
        Ok(())
    }
}

/// Points report `NonExistentLine`, spans `InvalidRange`.
fn check_target(range: LineRange, count: usize) -> Result<LineRange> {
    if range.is_point() && (range.lower == 0 || range.lower > count) {
        return Err(StoreError::NonExistentLine {
            line: range.lower,
            count,
        });
    }
    range.validate(count)
}

#[cfg(test)]
#[path = "../../tests/unit/store/store.rs"]
mod tests;
