//! Table snapshot types.
//!
//! The host owns the tables; the generator only ever reads a snapshot of
//! them for the duration of one run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One localization string table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Host-assigned display name. May contain arbitrary characters.
    pub name: String,

    /// Stable table identifier, unique per table.
    pub id: Uuid,

    /// Translatable keys of the table.
    #[serde(default)]
    pub entries: Vec<EntryDescriptor>,
}

/// One translatable key within a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDescriptor {
    /// Raw key, unique within its table.
    pub key: String,

    /// Stable entry identifier used to address the translation at runtime.
    pub id: u64,
}

impl TableDescriptor {
    /// Create a table with no entries.
    pub fn new(name: impl Into<String>, id: Uuid) -> Self {
        Self {
            name: name.into(),
            id,
            entries: Vec::new(),
        }
    }

    /// Add an entry.
    pub fn with_entry(mut self, key: impl Into<String>, id: u64) -> Self {
        self.entries.push(EntryDescriptor::new(key, id));
        self
    }

    /// Entries ordered by raw key, byte-wise ascending.
    ///
    /// Ties keep their snapshot order, so the result is deterministic for a
    /// given snapshot.
    pub fn sorted_entries(&self) -> Vec<&EntryDescriptor> {
        let mut entries: Vec<&EntryDescriptor> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));
        entries
    }
}

impl EntryDescriptor {
    /// Create an entry.
    pub fn new(key: impl Into<String>, id: u64) -> Self {
        Self {
            key: key.into(),
            id,
        }
    }
}
