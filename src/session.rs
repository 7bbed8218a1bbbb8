//! Editing session over one outline root.
//!
//! A `Session` owns everything the command loop acts on: the root and
//! active containers, the cursor, undo/redo history and the line store.
//! Every mutation resolves its defaults here (cursor position, blank
//! label), runs against the store, and records the inverse commands that
//! undo it as a single history record.

use crate::config::Settings;
use crate::error::{Result, StoreError};
use crate::models::command::Command;
use crate::models::cursor::Cursor;
use crate::models::history::{History, HistoryRecord};
use crate::models::order_key::OrderKey;
use crate::models::range::LineRange;
use crate::paths;
use crate::services::file::{FileProvider, LocalFileProvider};
use crate::store::{DensityReport, Entry, EntryInfo, Journal, LabelSource, LineStore, MoveOutcome};
use crate::workspace::RootLock;
use compact_str::CompactString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Session {
    root: PathBuf,
    active: PathBuf,
    store: LineStore,
    history: History,
    cursor: Cursor,
    settings: Settings,
    _lock: RootLock,
}

struct Replay {
    /// Inverse of what was applied, ready to replay in turn.
    inverse: Vec<Command>,
    failure: Option<(usize, StoreError)>,
}

impl Session {
    pub fn open(root: &Path) -> Result<Self> {
        let provider: Arc<dyn FileProvider> = Arc::new(LocalFileProvider::new());
        let settings = Settings::load(provider.as_ref(), root);
        Self::with_provider(root, settings, provider)
    }

    /// Locks the root, then finishes any renumbering a crash left behind.
    pub fn with_provider(
        root: &Path,
        settings: Settings,
        provider: Arc<dyn FileProvider>,
    ) -> Result<Self> {
        if !provider.is_dir(root) {
            return Err(StoreError::RootNotFound(root.to_path_buf()));
        }
        let lock = RootLock::acquire(provider.clone(), root)?;

        let mut store = LineStore::new(provider.clone());
        if settings.journal {
            store = store.with_journal(Journal::new(paths::journal_path(root), provider));
        }
        if let Some(report) = store.recover()? {
            let density = store.verify(&report.container)?;
            if !density.is_dense() {
                tracing::warn!(
                    container = %report.container.display(),
                    duplicates = ?density.duplicates,
                    missing = ?density.missing,
                    leftovers = density.leftovers.len(),
                    "container not dense after recovery"
                );
            }
        }

        tracing::info!(root = %root.display(), "session opened");
        Ok(Self {
            root: root.to_path_buf(),
            active: root.to_path_buf(),
            store,
            history: History::new(settings.history_limit),
            cursor: Cursor::new(),
            settings,
            _lock: lock,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn active(&self) -> &Path {
        &self.active
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ==================== Queries ====================

    pub fn count(&mut self) -> Result<usize> {
        self.store.count(&self.active)
    }

    pub fn entries(&mut self) -> Result<Vec<Entry>> {
        self.store.entries(&self.active)
    }

    pub fn entries_in_range(&mut self, range: LineRange) -> Result<Vec<Entry>> {
        self.store.entries_in_range(&self.active, range)
    }

    pub fn info(&mut self, key: usize) -> Result<EntryInfo> {
        self.store.info(&self.active, key)
    }

    pub fn verify(&mut self) -> Result<DensityReport> {
        self.store.verify(&self.active)
    }

    pub fn cursor(&self) -> usize {
        self.cursor.line()
    }

    pub fn set_cursor(&mut self, line: usize) -> Result<()> {
        let count = self.count()?;
        self.cursor.set(line, count)
    }

    // ==================== Mutations ====================

    /// Inserts at `at`, or at the cursor, and leaves the cursor just below
    /// the new line. The cursor starts at 1 in every container, so an insert
    /// without a position goes first until the cursor is moved.
    pub fn insert(&mut self, label: Option<&str>, at: Option<usize>) -> Result<Entry> {
        let at = at.unwrap_or_else(|| self.cursor.line());
        let label = label.unwrap_or(&self.settings.blank_label).to_string();

        let container = self.active.clone();
        let entry = self.store.insert(&container, at, &label)?;
        self.record(insert_inverse(at));

        let count = self.count()?;
        self.cursor.after_insert(at, count);
        Ok(entry)
    }

    pub fn delete(&mut self, target: Option<LineRange>, force: bool) -> Result<Vec<Entry>> {
        let range = self.resolve_target(target)?;
        let container = self.active.clone();
        let removed = self.store.delete(&container, range, force)?;
        self.record(delete_inverse(&removed));

        if self.cursor.line() > range.upper {
            let line = self.cursor.line() - range.width();
            let count = self.count()?;
            self.cursor.set(line, count)?;
        }
        self.clamp_cursor()?;
        Ok(removed)
    }

    pub fn rename(&mut self, source: &LabelSource, target: Option<LineRange>) -> Result<Vec<Entry>> {
        let range = self.resolve_target(target)?;
        let container = self.active.clone();
        let previous = self.store.rename(&container, range, source)?;
        if let Some(first) = previous.first() {
            let label = self.store.entry_at(&container, first.key)?.label;
            self.record(rename_inverse(range, &label, &previous));
        }
        Ok(previous)
    }

    /// With `confirmed`, a block that would end past the last line extends
    /// the container with blank lines; otherwise that case is reported back
    /// untouched.
    pub fn move_lines(&mut self, range: LineRange, to: usize, confirmed: bool) -> Result<MoveOutcome> {
        let container = self.active.clone();
        let extension = confirmed.then(|| self.settings.blank_label.clone());
        let outcome = self
            .store
            .move_block(&container, range, to, extension.as_deref())?;
        self.record(move_inverse(range, to, &outcome));
        self.clamp_cursor()?;
        Ok(outcome)
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        let container = self.active.clone();
        self.store.swap(&container, a, b)?;
        self.record(swap_inverse(a, b));
        Ok(())
    }

    // ==================== History ====================

    /// Reverts the latest recorded mutation in the container it was made in.
    pub fn undo(&mut self) -> Result<()> {
        let record = self.history.pop_undo().ok_or(StoreError::NoHistory)?;
        let replay = self.replay(&record);
        let context = record.context.clone();

        match replay.failure {
            None => {
                self.history
                    .push_redo(HistoryRecord::new(replay.inverse, context));
                self.after_replay(&record.context)
            }
            Some((index, err)) => {
                tracing::warn!(error = %err, index, "undo failed part way");
                let remaining = record.inverse[index..].to_vec();
                self.history
                    .push_undo(HistoryRecord::new(remaining, context.clone()));
                self.history
                    .push_redo(HistoryRecord::new(replay.inverse, context));
                self.after_replay(&record.context)?;
                Err(err)
            }
        }
    }

    pub fn redo(&mut self) -> Result<()> {
        let record = self.history.pop_redo().ok_or(StoreError::NoRedo)?;
        let replay = self.replay(&record);
        let context = record.context.clone();

        match replay.failure {
            None => {
                self.history
                    .push_undo(HistoryRecord::new(replay.inverse, context));
                self.after_replay(&record.context)
            }
            Some((index, err)) => {
                tracing::warn!(error = %err, index, "redo failed part way");
                let remaining = record.inverse[index..].to_vec();
                self.history
                    .push_redo(HistoryRecord::new(remaining, context.clone()));
                self.history
                    .push_undo(HistoryRecord::new(replay.inverse, context));
                self.after_replay(&record.context)?;
                Err(err)
            }
        }
    }

    // ==================== Navigation ====================

    /// Makes line `key` the active container.
    pub fn enter(&mut self, key: usize) -> Result<()> {
        let container = self.active.clone();
        let entry = self.store.entry_at(&container, key)?;
        self.active = entry.path;
        self.cursor = Cursor::new();
        tracing::debug!(active = %self.active.display(), "enter");
        Ok(())
    }

    /// Returns to the parent container; false at the root.
    pub fn leave(&mut self) -> bool {
        if self.active == self.root {
            return false;
        }
        match self.active.parent() {
            Some(parent) if parent.starts_with(&self.root) => {
                self.active = parent.to_path_buf();
                self.cursor = Cursor::new();
                true
            }
            _ => false,
        }
    }

    /// Root name followed by the label of each container down to the active one.
    pub fn breadcrumb(&self) -> Vec<CompactString> {
        let mut crumbs = Vec::new();
        if let Some(name) = self.root.file_name() {
            crumbs.push(CompactString::from(name.to_string_lossy().as_ref()));
        }
        if let Ok(relative) = self.active.strip_prefix(&self.root) {
            for component in relative.components() {
                let name = component.as_os_str().to_string_lossy();
                let label = OrderKey::parse(&name)
                    .map(|key| key.label)
                    .unwrap_or_else(|_| CompactString::from(name.as_ref()));
                crumbs.push(label);
            }
        }
        crumbs
    }

    // ==================== Internals ====================

    fn record(&mut self, inverse: Vec<Command>) {
        self.history
            .push(HistoryRecord::new(inverse, self.active.clone()));
    }

    /// Explicit target, else the cursor line (or the last line while the
    /// cursor sits at the append position).
    fn resolve_target(&mut self, target: Option<LineRange>) -> Result<LineRange> {
        if let Some(range) = target {
            return Ok(range);
        }
        let count = self.count()?;
        self.cursor
            .existing_line(count)
            .map(LineRange::point)
            .ok_or(StoreError::NonExistentLine {
                line: self.cursor.line(),
                count,
            })
    }

    fn clamp_cursor(&mut self) -> Result<()> {
        let count = self.count()?;
        self.cursor.clamp(count);
        Ok(())
    }

    /// Applies each command in order; the collected inverse is reversed so
    /// that replaying it undoes the last command first.
    fn replay(&mut self, record: &HistoryRecord) -> Replay {
        let mut inverse: Vec<Command> = Vec::new();
        for (index, command) in record.inverse.iter().enumerate() {
            match self.apply(&record.context, command) {
                Ok(mut undo) => {
                    undo.append(&mut inverse);
                    inverse = undo;
                }
                Err(err) => {
                    return Replay {
                        inverse,
                        failure: Some((index, err)),
                    }
                }
            }
            tracing::debug!(command = %command, context = %record.context.display(), "replayed");
        }
        Replay {
            inverse,
            failure: None,
        }
    }

    fn apply(&mut self, container: &Path, command: &Command) -> Result<Vec<Command>> {
        match command {
            Command::Insert { at, label } => {
                self.store.insert(container, *at, label)?;
                Ok(insert_inverse(*at))
            }
            Command::Delete { range, force } => {
                let removed = self.store.delete(container, *range, *force)?;
                Ok(delete_inverse(&removed))
            }
            Command::Rename { range, label } => {
                let previous =
                    self.store
                        .rename(container, *range, &LabelSource::Text(label.clone()))?;
                Ok(rename_inverse(*range, label, &previous))
            }
            Command::Move { range, to } => {
                let blank = self.settings.blank_label.clone();
                let outcome = self
                    .store
                    .move_block(container, *range, *to, Some(blank.as_str()))?;
                Ok(move_inverse(*range, *to, &outcome))
            }
            Command::Swap { a, b } => {
                self.store.swap(container, *a, *b)?;
                Ok(swap_inverse(*a, *b))
            }
        }
    }

    /// A replay in an ancestor container may rename the active one away.
    fn after_replay(&mut self, context: &Path) -> Result<()> {
        if !self.store.provider().is_dir(&self.active) {
            tracing::info!(
                active = %self.active.display(),
                context = %context.display(),
                "active container moved by replay"
            );
            self.active = context.to_path_buf();
            self.cursor = Cursor::new();
        }
        self.clamp_cursor()
    }
}

fn insert_inverse(at: usize) -> Vec<Command> {
    vec![Command::Delete {
        range: LineRange::point(at),
        force: false,
    }]
}

/// Re-inserting lowest first puts every line back on its old key.
fn delete_inverse(removed: &[Entry]) -> Vec<Command> {
    removed
        .iter()
        .map(|entry| Command::Insert {
            at: entry.key,
            label: entry.label.clone(),
        })
        .collect()
}

fn rename_inverse(range: LineRange, current: &str, previous: &[Entry]) -> Vec<Command> {
    let unchanged = previous.iter().all(|entry| entry.label == current);
    if unchanged {
        return Vec::new();
    }

    let Some(first) = previous.first() else {
        return Vec::new();
    };
    if previous.iter().all(|entry| entry.label == first.label) {
        return vec![Command::Rename {
            range,
            label: first.label.clone(),
        }];
    }
    previous
        .iter()
        .map(|entry| Command::Rename {
            range: LineRange::point(entry.key),
            label: entry.label.clone(),
        })
        .collect()
}

/// Moves the block back, then drops any blank lines the move added; those
/// sit at the end again once the block is home.
fn move_inverse(range: LineRange, to: usize, outcome: &MoveOutcome) -> Vec<Command> {
    let MoveOutcome::Moved { created } = outcome else {
        return Vec::new();
    };

    let mut inverse = vec![Command::Move {
        range: LineRange::new(to, to + range.width() - 1),
        to: range.lower,
    }];
    if let (Some(first), Some(last)) = (created.first(), created.last()) {
        inverse.push(Command::Delete {
            range: LineRange::new(first.key, last.key),
            force: false,
        });
    }
    inverse
}

fn swap_inverse(a: usize, b: usize) -> Vec<Command> {
    if a == b {
        return Vec::new();
    }
    vec![Command::Swap { a, b }]
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
