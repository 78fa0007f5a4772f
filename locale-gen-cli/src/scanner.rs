//! Table file scanner.
//!
//! Discovers `*.json` and `*.toml` table files under a directory and parses
//! them into [`TableDescriptor`] snapshots. One file holds one table.

use locale_gen::{SourceError, TableDescriptor, TableSource};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Supported table file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Json,
    Toml,
}

impl TableFormat {
    /// Format for a file, from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Parse one table from file content.
    pub fn parse(self, path: &Path, content: &str) -> Result<TableDescriptor, SourceError> {
        match self {
            Self::Json => serde_json::from_str(content)
                .map_err(|e| SourceError::parse(path.to_path_buf(), e.to_string())),
            Self::Toml => toml::from_str(content)
                .map_err(|e| SourceError::parse(path.to_path_buf(), e.to_string())),
        }
    }
}

/// A discovered table file.
#[derive(Debug, Clone)]
pub struct TableFile {
    /// Absolute path to the file.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// Detected format.
    pub format: TableFormat,
}

/// Outcome of loading every table file under the root.
#[derive(Debug, Default)]
pub struct LoadedTables {
    /// Tables parsed successfully, in path order.
    pub tables: Vec<TableDescriptor>,

    /// Files that could not be used.
    pub errors: Vec<SourceError>,
}

/// Table source backed by a directory of table files.
#[derive(Debug, Clone)]
pub struct DirectoryTableSource {
    /// Root directory to scan.
    root: PathBuf,

    /// Optional glob filter pattern.
    filter: Option<glob::Pattern>,
}

impl DirectoryTableSource {
    /// Create a new source for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: None,
        }
    }

    /// Only include files whose root-relative path matches `pattern`.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, glob::PatternError> {
        self.filter = Some(glob::Pattern::new(pattern)?);
        Ok(self)
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find table files, sorted by path.
    pub fn scan(&self) -> Result<Vec<TableFile>, SourceError> {
        if !self.root.exists() {
            return Err(SourceError::not_found(self.root.clone()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| SourceError::Walk(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(format) = TableFormat::from_path(path) else {
                continue;
            };

            let relative_path = self.relative_path(path);
            if let Some(ref pattern) = self.filter {
                if !pattern.matches_path(&relative_path) {
                    continue;
                }
            }

            files.push(TableFile {
                path: path.to_path_buf(),
                relative_path,
                format,
            });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    /// Read and parse every table file.
    ///
    /// Unreadable or malformed files, and files repeating a table id that
    /// was already loaded, end up in `errors`; the rest still load.
    pub fn load(&self) -> Result<LoadedTables, SourceError> {
        let mut loaded = LoadedTables::default();
        let mut seen_ids = HashSet::new();

        for file in self.scan()? {
            let table = std::fs::read_to_string(&file.path)
                .map_err(|source| SourceError::Io {
                    path: file.path.clone(),
                    source,
                })
                .and_then(|content| file.format.parse(&file.path, &content));

            match table {
                Ok(table) if !seen_ids.insert(table.id) => {
                    loaded.errors.push(SourceError::parse(
                        file.path,
                        format!("duplicate table id {}", table.id),
                    ));
                }
                Ok(table) => {
                    debug!(
                        file = %file.relative_path.display(),
                        table = %table.name,
                        entries = table.entries.len(),
                        "loaded table"
                    );
                    loaded.tables.push(table);
                }
                Err(e) => loaded.errors.push(e),
            }
        }

        Ok(loaded)
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

impl TableSource for DirectoryTableSource {
    fn list_string_tables(&self) -> Result<Vec<TableDescriptor>, SourceError> {
        let loaded = self.load()?;
        for error in &loaded.errors {
            warn!(error = %error, "skipping table file");
        }
        Ok(loaded.tables)
    }
}
