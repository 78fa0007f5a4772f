//! File watcher for watch mode.
//!
//! Watches the table directory and reports debounced changes to table
//! files. [`regenerate_on_change`] turns each batch of changes into entry
//! events by diffing table snapshots.

use crate::error::{CliResult, WatchError};
use crate::scanner::TableFormat;
use locale_gen::{
    diff_snapshots, GenerateReport, GenerateResult, OutputFileSystem, Regenerator, Settings,
    SourceError, TableDescriptor, TableEvent, TableSource, Trigger,
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use tracing::debug;

/// Event types for file changes.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A table file was created or modified.
    Modified(PathBuf),
    /// A table file was deleted.
    Deleted(PathBuf),
    /// An error occurred.
    Error(String),
}

/// File watcher for monitoring table files.
pub struct FileWatcher {
    /// Root directory to watch.
    root: PathBuf,
    /// Debounce duration in milliseconds.
    debounce_ms: u64,
}

impl FileWatcher {
    /// Create a new file watcher for the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            debounce_ms: 500,
        }
    }

    /// Set the debounce duration in milliseconds.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Start watching for file changes.
    ///
    /// The debouncer must be kept alive for as long as events are wanted;
    /// dropping it stops the watch.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = channel::<WatchEvent>();

        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        let Some(watch_event) = WatchEvent::from_path(event.path) else {
                            continue;
                        };
                        if tx.send(watch_event).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::Init(e.to_string()))?;

        Ok((debouncer, rx))
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl WatchEvent {
    /// Classify a changed path. Files that are not tables yield `None`.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        TableFormat::from_path(&path)?;

        if path.exists() {
            Some(WatchEvent::Modified(path))
        } else {
            Some(WatchEvent::Deleted(path))
        }
    }

    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Modified(p) | WatchEvent::Deleted(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// What one batch of file changes amounted to.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Entry events found by diffing the snapshots.
    pub events: Vec<TableEvent>,
    /// Regeneration result, `None` when no entry was added or removed.
    pub report: Option<GenerateResult<GenerateReport>>,
}

/// Apply one debounced batch of table file changes.
///
/// Lists the tables again, diffs them against `snapshot` and replaces the
/// snapshot. A batch with at least one entry event regenerates exactly once,
/// triggered by its first event. When the tables cannot be listed the
/// snapshot is kept and the error returned.
pub fn regenerate_on_change<S, F>(
    snapshot: &mut Vec<TableDescriptor>,
    regenerator: &mut Regenerator<S, F>,
    settings: &Settings,
) -> Result<BatchOutcome, SourceError>
where
    S: TableSource,
    F: OutputFileSystem,
{
    let current = regenerator.source().list_string_tables()?;
    let events = diff_snapshots(snapshot, &current);
    *snapshot = current;

    let report = match events.first() {
        Some(first) => Some(regenerator.handle(&Trigger::from(first.clone()), settings)),
        None => {
            debug!("table files changed without adding or removing entries");
            None
        }
    };

    Ok(BatchOutcome { events, report })
}
