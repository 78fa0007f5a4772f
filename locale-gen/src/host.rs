//! Collaborator traits the generator consumes.
//!
//! The generator never talks to the disk or to the table store directly.
//! It goes through [`TableSource`] for the snapshot and [`OutputFileSystem`]
//! for every side effect, so the composition root decides what "the host"
//! is. [`MemoryFileSystem`] is a self-contained implementation for embedding
//! and tests.

use crate::error::SourceError;
use crate::model::TableDescriptor;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Provides the current set of string tables.
pub trait TableSource {
    /// List all string tables. Enumeration order is source-defined and is
    /// preserved in the generated document.
    fn list_string_tables(&self) -> Result<Vec<TableDescriptor>, SourceError>;
}

impl TableSource for Vec<TableDescriptor> {
    fn list_string_tables(&self) -> Result<Vec<TableDescriptor>, SourceError> {
        Ok(self.clone())
    }
}

impl<T: TableSource + ?Sized> TableSource for &T {
    fn list_string_tables(&self) -> Result<Vec<TableDescriptor>, SourceError> {
        (**self).list_string_tables()
    }
}

/// Result of a write request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file now holds the new content.
    Written {
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run: nothing was touched.
    DryRun,
}

impl WriteOutcome {
    /// Check if the file was actually written.
    pub fn was_written(&self) -> bool {
        matches!(self, WriteOutcome::Written { .. })
    }

    /// Get the number of bytes written (0 for dry-run).
    pub fn bytes(&self) -> usize {
        match self {
            WriteOutcome::Written { bytes } => *bytes,
            WriteOutcome::DryRun => 0,
        }
    }
}

/// File operations and the host's import signal.
pub trait OutputFileSystem {
    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and all missing parents.
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()>;

    /// Read a whole file as UTF-8.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Replace the complete contents of `path` with `contents`.
    ///
    /// Implementations must never leave a partially written file behind.
    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<WriteOutcome>;

    /// Delete the file at `path`.
    fn delete_file(&mut self, path: &Path) -> io::Result<()>;

    /// Tell the host that `path` is new or changed.
    fn import_asset(&mut self, path: &Path);
}

/// In-memory [`OutputFileSystem`].
///
/// Directories are tracked implicitly: a directory exists when it was
/// created or when a file below it exists.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: BTreeMap<PathBuf, String>,
    dirs: Vec<PathBuf>,
    imported: Vec<PathBuf>,
    read_only: bool,
}

impl MemoryFileSystem {
    /// Create an empty file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every mutating call fail with `PermissionDenied`.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Seed a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Content of a file, if present.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// Paths passed to [`OutputFileSystem::import_asset`], in call order.
    pub fn imported(&self) -> &[PathBuf] {
        &self.imported
    }

    fn check_writable(&self) -> io::Result<()> {
        if self.read_only {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "file system is read-only",
            ));
        }
        Ok(())
    }
}

impl OutputFileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self.dirs.iter().any(|d| d.starts_with(path))
            || self.files.keys().any(|f| f.starts_with(path))
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        self.check_writable()?;
        if !self.dirs.iter().any(|d| d == path) {
            self.dirs.push(path.to_path_buf());
        }
        Ok(())
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<WriteOutcome> {
        self.check_writable()?;
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(WriteOutcome::Written {
            bytes: contents.len(),
        })
    }

    fn delete_file(&mut self, path: &Path) -> io::Result<()> {
        self.check_writable()?;
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn import_asset(&mut self, path: &Path) {
        self.imported.push(path.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_write_and_read() {
        let mut fs = MemoryFileSystem::new();
        let path = Path::new("Assets/out.cs");

        let outcome = fs.write_file(path, "class A {}").unwrap();
        assert_eq!(outcome.bytes(), 10);
        assert!(outcome.was_written());
        assert_eq!(fs.read_file(path).unwrap(), "class A {}");
        assert!(fs.exists(Path::new("Assets")));
    }

    #[test]
    fn test_memory_delete_missing_is_not_found() {
        let mut fs = MemoryFileSystem::new();
        let err = fs.delete_file(Path::new("missing.cs")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_memory_read_only_rejects_writes() {
        let mut fs = MemoryFileSystem::new().read_only();
        let err = fs.write_file(Path::new("a.cs"), "x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_write_outcome_dry_run() {
        assert!(!WriteOutcome::DryRun.was_written());
        assert_eq!(WriteOutcome::DryRun.bytes(), 0);
    }

    #[test]
    fn test_vec_table_source() {
        let tables = vec![TableDescriptor::new("Menu", uuid::Uuid::nil())];
        assert_eq!(tables.list_string_tables().unwrap(), tables);
    }
}
