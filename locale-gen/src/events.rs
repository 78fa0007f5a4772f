//! Entry-level change detection between table snapshots.
//!
//! Hosts without native change notifications (a directory of table files,
//! for instance) can diff two snapshots to recover the same entry added /
//! entry removed signals an editor would fire.

use crate::model::{EntryDescriptor, TableDescriptor};
use std::collections::HashMap;
use uuid::Uuid;

/// A single entry-level change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// An entry appeared in a table.
    EntryAdded {
        table: String,
        table_id: Uuid,
        key: String,
        entry_id: u64,
    },
    /// An entry disappeared from a table.
    EntryRemoved {
        table: String,
        table_id: Uuid,
        key: String,
        entry_id: u64,
    },
}

impl TableEvent {
    fn added(table: &TableDescriptor, entry: &EntryDescriptor) -> Self {
        Self::EntryAdded {
            table: table.name.clone(),
            table_id: table.id,
            key: entry.key.clone(),
            entry_id: entry.id,
        }
    }

    fn removed(table: &TableDescriptor, entry: &EntryDescriptor) -> Self {
        Self::EntryRemoved {
            table: table.name.clone(),
            table_id: table.id,
            key: entry.key.clone(),
            entry_id: entry.id,
        }
    }

    /// Name of the table the event belongs to.
    pub fn table(&self) -> &str {
        match self {
            Self::EntryAdded { table, .. } | Self::EntryRemoved { table, .. } => table,
        }
    }

    /// Raw key of the affected entry.
    pub fn key(&self) -> &str {
        match self {
            Self::EntryAdded { key, .. } | Self::EntryRemoved { key, .. } => key,
        }
    }
}

/// Compute the entry-level changes from `previous` to `current`.
///
/// Tables are matched by id, entries by id and key, so renaming a key shows
/// up as a removal plus an addition. Events for tables in `current` come
/// first, in snapshot order, additions before removals and entries by key;
/// entries of tables that vanished entirely come last.
pub fn diff_snapshots(previous: &[TableDescriptor], current: &[TableDescriptor]) -> Vec<TableEvent> {
    let previous_by_id: HashMap<Uuid, &TableDescriptor> =
        previous.iter().map(|t| (t.id, t)).collect();
    let mut events = Vec::new();

    for table in current {
        match previous_by_id.get(&table.id) {
            Some(old) => {
                for entry in table.sorted_entries() {
                    if !contains_entry(old, entry) {
                        events.push(TableEvent::added(table, entry));
                    }
                }
                for entry in old.sorted_entries() {
                    if !contains_entry(table, entry) {
                        events.push(TableEvent::removed(old, entry));
                    }
                }
            }
            None => {
                events.extend(
                    table
                        .sorted_entries()
                        .into_iter()
                        .map(|entry| TableEvent::added(table, entry)),
                );
            }
        }
    }

    for old in previous {
        if current.iter().any(|t| t.id == old.id) {
            continue;
        }
        events.extend(
            old.sorted_entries()
                .into_iter()
                .map(|entry| TableEvent::removed(old, entry)),
        );
    }

    events
}

fn contains_entry(table: &TableDescriptor, entry: &EntryDescriptor) -> bool {
    table
        .entries
        .iter()
        .any(|e| e.id == entry.id && e.key == entry.key)
}
