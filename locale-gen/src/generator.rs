//! Locale class generator.
//!
//! Renders a table snapshot and hands the text to an [`OutputFileSystem`].
//! Every run rewrites the whole file; there is no incremental mode.

use crate::error::{GenerateError, GenerateResult};
use crate::host::{OutputFileSystem, WriteOutcome};
use crate::model::TableDescriptor;
use crate::render::{render, GeneratedDocument};
use crate::sanitize::SanitizePolicy;
use crate::settings::DEFAULT_PREFIX;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default name of the generated file.
pub const DEFAULT_FILE_NAME: &str = "LocaleClasses.g.cs";

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Prepended to every table class name.
    pub prefix: String,

    /// Delete the file at the previous location when the target folder moves.
    pub support_folder_migration: bool,

    /// Name of the generated file inside the target folder.
    pub file_name: String,

    /// Policy for table names.
    pub table_policy: SanitizePolicy,

    /// Policy for entry keys.
    pub entry_policy: SanitizePolicy,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            support_folder_migration: true,
            file_name: DEFAULT_FILE_NAME.to_string(),
            table_policy: SanitizePolicy::PROPERTY_NAME,
            entry_policy: SanitizePolicy::PROPERTY_NAME,
        }
    }
}

impl GeneratorOptions {
    /// Set the class prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enable or disable deleting the stale file on folder changes.
    pub fn with_folder_migration(mut self, enabled: bool) -> Self {
        self.support_folder_migration = enabled;
        self
    }

    /// Set the generated file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Set the table name policy.
    pub fn with_table_policy(mut self, policy: SanitizePolicy) -> Self {
        self.table_policy = policy;
        self
    }

    /// Set the entry key policy.
    pub fn with_entry_policy(mut self, policy: SanitizePolicy) -> Self {
        self.entry_policy = policy;
        self
    }
}

/// Summary of a successful generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Output file path.
    pub path: PathBuf,

    /// What happened to the file.
    pub outcome: WriteOutcome,

    /// Number of table classes emitted.
    pub classes: usize,

    /// Number of accessors emitted across all classes.
    pub accessors: usize,

    /// The rendered text.
    pub content: String,
}

/// State of an existing output file compared with a fresh render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The file matches the current tables.
    UpToDate,
    /// The file exists but differs.
    Stale,
    /// There is no file at the output path.
    Missing,
}

/// Renders tables into a C# file.
#[derive(Debug, Clone, Default)]
pub struct LocaleGenerator {
    options: GeneratorOptions,
}

impl LocaleGenerator {
    /// Create a new generator with the given options.
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Options this generator was built with.
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Output file path inside `folder`.
    pub fn output_path(&self, folder: &Path) -> PathBuf {
        folder.join(&self.options.file_name)
    }

    /// Render `tables` without touching the file system.
    pub fn render(&self, tables: &[TableDescriptor]) -> GeneratedDocument {
        render(tables, &self.options)
    }

    /// Render `tables` and write the result to `output_path`.
    ///
    /// Creates the parent directory when missing, replaces the file as a
    /// whole and then signals the host to import it.
    pub fn generate(
        &self,
        tables: &[TableDescriptor],
        output_path: &Path,
        fs: &mut dyn OutputFileSystem,
    ) -> GenerateResult<GenerateReport> {
        let document = self.render(tables);
        let content = document.text();

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() && !fs.exists(parent) {
                debug!(dir = %parent.display(), "creating output directory");
                fs.create_dir_all(parent)
                    .map_err(|source| GenerateError::CreateDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        let outcome =
            fs.write_file(output_path, &content)
                .map_err(|source| GenerateError::WriteFile {
                    path: output_path.to_path_buf(),
                    source,
                })?;

        if outcome.was_written() {
            fs.import_asset(output_path);
        }

        info!(
            path = %output_path.display(),
            classes = document.classes().len(),
            accessors = document.accessor_count(),
            bytes = outcome.bytes(),
            "generated locale classes"
        );

        Ok(GenerateReport {
            path: output_path.to_path_buf(),
            outcome,
            classes: document.classes().len(),
            accessors: document.accessor_count(),
            content,
        })
    }

    /// Compare the file at `output_path` with a fresh render of `tables`.
    pub fn check(
        &self,
        tables: &[TableDescriptor],
        output_path: &Path,
        fs: &dyn OutputFileSystem,
    ) -> GenerateResult<CheckOutcome> {
        if !fs.exists(output_path) {
            return Ok(CheckOutcome::Missing);
        }

        let existing = fs
            .read_file(output_path)
            .map_err(|source| GenerateError::ReadFile {
                path: output_path.to_path_buf(),
                source,
            })?;

        if existing == self.render(tables).text() {
            Ok(CheckOutcome::UpToDate)
        } else {
            Ok(CheckOutcome::Stale)
        }
    }

    /// Best-effort removal of a previously generated file.
    ///
    /// A missing file is not an error. Other failures are logged and
    /// reported as `false`.
    pub fn remove_stale(&self, old_path: &Path, fs: &mut dyn OutputFileSystem) -> bool {
        if !fs.exists(old_path) {
            debug!(path = %old_path.display(), "no stale output to remove");
            return false;
        }

        match fs.delete_file(old_path) {
            Ok(()) => {
                info!(path = %old_path.display(), "removed stale locale classes");
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %old_path.display(), error = %e, "failed to remove stale output");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryFileSystem;
    use uuid::Uuid;

    fn tables() -> Vec<TableDescriptor> {
        vec![TableDescriptor::new("UI Texts", Uuid::from_u128(1))
            .with_entry("ok", 1)
            .with_entry("cancel", 2)]
    }

    #[test]
    fn test_default_options() {
        let options = GeneratorOptions::default();
        assert_eq!(options.prefix, "Locale_");
        assert_eq!(options.file_name, "LocaleClasses.g.cs");
        assert!(options.support_folder_migration);
        assert_eq!(options.table_policy, SanitizePolicy::PROPERTY_NAME);
        assert_eq!(options.entry_policy, SanitizePolicy::PROPERTY_NAME);
    }

    #[test]
    fn test_generate_writes_and_imports() {
        let generator = LocaleGenerator::default();
        let mut fs = MemoryFileSystem::new();
        let path = generator.output_path(Path::new("Assets/Generated"));

        let report = generator.generate(&tables(), &path, &mut fs).unwrap();

        assert_eq!(report.classes, 1);
        assert_eq!(report.accessors, 2);
        assert_eq!(fs.file(&path), Some(report.content.as_str()));
        assert_eq!(fs.imported(), &[path.clone()]);
        assert!(fs.exists(Path::new("Assets/Generated")));
    }

    #[test]
    fn test_generate_overwrites_existing_file() {
        let generator = LocaleGenerator::default();
        let path = PathBuf::from("Assets/LocaleClasses.g.cs");
        let mut fs = MemoryFileSystem::new().with_file(&path, "stale content");

        generator.generate(&tables(), &path, &mut fs).unwrap();

        let written = fs.file(&path).unwrap();
        assert!(!written.contains("stale content"));
        assert!(written.starts_with("//Auto-Generated file."));
    }

    #[test]
    fn test_generate_reports_write_failure() {
        let generator = LocaleGenerator::default();
        let mut fs = MemoryFileSystem::new().read_only();
        let path = PathBuf::from("LocaleClasses.g.cs");

        let err = generator.generate(&tables(), &path, &mut fs).unwrap_err();

        assert!(matches!(err, GenerateError::WriteFile { .. }));
        assert!(fs.imported().is_empty());
    }

    #[test]
    fn test_generate_reports_directory_failure() {
        let generator = LocaleGenerator::default();
        let mut fs = MemoryFileSystem::new().read_only();
        let path = PathBuf::from("Assets/Gen/LocaleClasses.g.cs");

        let err = generator.generate(&tables(), &path, &mut fs).unwrap_err();

        assert!(matches!(err, GenerateError::CreateDir { .. }));
        assert_eq!(err.path(), Some(Path::new("Assets/Gen")));
    }

    #[test]
    fn test_check_outcomes() {
        let generator = LocaleGenerator::default();
        let path = PathBuf::from("Assets/LocaleClasses.g.cs");
        let mut fs = MemoryFileSystem::new();

        assert_eq!(
            generator.check(&tables(), &path, &fs).unwrap(),
            CheckOutcome::Missing
        );

        generator.generate(&tables(), &path, &mut fs).unwrap();
        assert_eq!(
            generator.check(&tables(), &path, &fs).unwrap(),
            CheckOutcome::UpToDate
        );

        let changed = vec![tables()[0].clone().with_entry("retry", 3)];
        assert_eq!(
            generator.check(&changed, &path, &fs).unwrap(),
            CheckOutcome::Stale
        );
    }

    #[test]
    fn test_remove_stale() {
        let generator = LocaleGenerator::default();
        let path = PathBuf::from("Old/LocaleClasses.g.cs");
        let mut fs = MemoryFileSystem::new().with_file(&path, "old");

        assert!(generator.remove_stale(&path, &mut fs));
        assert!(fs.file(&path).is_none());
        assert!(!generator.remove_stale(&path, &mut fs));
    }
}
