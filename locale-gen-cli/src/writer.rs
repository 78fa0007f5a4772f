//! Local file system output.
//!
//! Writes the generated file to disk atomically, with support for dry-run
//! mode. There is no asset database outside an editor, so the import signal
//! is only logged.

use locale_gen::{OutputFileSystem, WriteOutcome};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// File system sink with dry-run support.
#[derive(Debug, Default)]
pub struct LocalFileSystem {
    /// Whether to run in dry-run mode.
    dry_run: bool,
}

impl LocalFileSystem {
    /// Create a new file system sink.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl OutputFileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        if self.dry_run {
            return Ok(());
        }
        std::fs::create_dir_all(path)
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<WriteOutcome> {
        if self.dry_run {
            return Ok(WriteOutcome::DryRun);
        }

        // Write next to the target so the final rename stays on one device.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        file.persist(path).map_err(|e| e.error)?;

        Ok(WriteOutcome::Written {
            bytes: contents.len(),
        })
    }

    fn delete_file(&mut self, path: &Path) -> io::Result<()> {
        if self.dry_run {
            return Ok(());
        }
        std::fs::remove_file(path)
    }

    fn import_asset(&mut self, path: &Path) {
        debug!(path = %path.display(), "output ready for import");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("LocaleClasses.g.cs");

        let mut fs = LocalFileSystem::new(false);
        let outcome = fs.write_file(&path, "public static class A {}\n").unwrap();

        assert_eq!(outcome, WriteOutcome::Written { bytes: 25 });
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "public static class A {}\n"
        );
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("LocaleClasses.g.cs");
        std::fs::write(&path, "old content that is longer").unwrap();

        let mut fs = LocalFileSystem::new(false);
        fs.write_file(&path, "new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file must not remain");
    }

    #[test]
    fn test_dry_run_does_not_touch_disk() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("Assets/Generated");
        let path = nested.join("LocaleClasses.g.cs");

        let mut fs = LocalFileSystem::new(true);
        assert!(fs.is_dry_run());
        fs.create_dir_all(&nested).unwrap();
        let outcome = fs.write_file(&path, "content").unwrap();

        assert_eq!(outcome, WriteOutcome::DryRun);
        assert!(!nested.exists());
    }

    #[test]
    fn test_delete_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.g.cs");
        std::fs::write(&path, "x").unwrap();

        let mut fs = LocalFileSystem::new(false);
        assert!(fs.exists(&path));
        fs.delete_file(&path).unwrap();
        assert!(!fs.exists(&path));
    }

    #[test]
    fn test_delete_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut fs = LocalFileSystem::new(false);

        let err = fs.delete_file(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
