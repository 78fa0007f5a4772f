//! Generation triggers.
//!
//! Every trigger leads to a full regeneration. A target folder change also
//! removes the file at the previous location first, when folder migration
//! is enabled.

use crate::error::GenerateResult;
use crate::events::TableEvent;
use crate::generator::{GenerateReport, GeneratorOptions, LocaleGenerator};
use crate::host::{OutputFileSystem, TableSource};
use crate::settings::{Settings, TargetFolderChange};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Something that asks for regeneration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Explicit user request.
    Manual,
    /// The host added an entry to a table.
    EntryAdded { table: String, key: String },
    /// The host removed an entry from a table.
    EntryRemoved { table: String, key: String },
    /// The output folder moved from `old` to `new`.
    TargetFolderChanged { old: PathBuf, new: PathBuf },
}

impl From<TableEvent> for Trigger {
    fn from(event: TableEvent) -> Self {
        match event {
            TableEvent::EntryAdded { table, key, .. } => Trigger::EntryAdded { table, key },
            TableEvent::EntryRemoved { table, key, .. } => Trigger::EntryRemoved { table, key },
        }
    }
}

impl From<&TargetFolderChange> for Trigger {
    fn from(change: &TargetFolderChange) -> Self {
        Trigger::TargetFolderChanged {
            old: change.old.clone(),
            new: change.new.clone(),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Manual => write!(f, "manual"),
            Trigger::EntryAdded { table, key } => write!(f, "entry '{key}' added to '{table}'"),
            Trigger::EntryRemoved { table, key } => {
                write!(f, "entry '{key}' removed from '{table}'")
            }
            Trigger::TargetFolderChanged { old, new } => write!(
                f,
                "target folder changed from {} to {}",
                old.display(),
                new.display()
            ),
        }
    }
}

/// Applies triggers: pulls a fresh snapshot and regenerates.
pub struct Regenerator<S, F> {
    options: GeneratorOptions,
    project_root: PathBuf,
    source: S,
    fs: F,
}

impl<S, F> Regenerator<S, F>
where
    S: TableSource,
    F: OutputFileSystem,
{
    /// Create a regenerator. Target folders are resolved against
    /// `project_root`.
    pub fn new(options: GeneratorOptions, project_root: impl Into<PathBuf>, source: S, fs: F) -> Self {
        Self {
            options,
            project_root: project_root.into(),
            source,
            fs,
        }
    }

    /// File system used for output.
    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Table source used for snapshots.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Generator configured with the current settings' prefix.
    pub fn generator(&self, settings: &Settings) -> LocaleGenerator {
        LocaleGenerator::new(self.options.clone().with_prefix(settings.prefix.clone()))
    }

    /// Output file path for a project-relative target folder.
    pub fn output_path(&self, folder: &Path) -> PathBuf {
        self.project_root.join(folder).join(&self.options.file_name)
    }

    /// Handle one trigger.
    ///
    /// Failures are logged here with their full context and returned to the
    /// caller; nothing is fatal and the next trigger simply tries again.
    pub fn handle(&mut self, trigger: &Trigger, settings: &Settings) -> GenerateResult<GenerateReport> {
        info!(%trigger, "regenerating locale classes");

        let result = self.apply(trigger, settings);
        if let Err(e) = &result {
            error!(%trigger, error = %e, "failed to generate locale classes");
        }
        result
    }

    fn apply(&mut self, trigger: &Trigger, settings: &Settings) -> GenerateResult<GenerateReport> {
        let generator = self.generator(settings);

        let folder = match trigger {
            Trigger::TargetFolderChanged { old, new } => {
                if self.options.support_folder_migration {
                    let stale = self.output_path(old);
                    generator.remove_stale(&stale, &mut self.fs);
                }
                new.as_path()
            }
            Trigger::Manual | Trigger::EntryAdded { .. } | Trigger::EntryRemoved { .. } => {
                settings.target_folder.as_path()
            }
        };

        let output_path = self.output_path(folder);
        let tables = self.source.list_string_tables()?;
        generator.generate(&tables, &output_path, &mut self.fs)
    }
}

impl<S, F> fmt::Debug for Regenerator<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Regenerator")
            .field("options", &self.options)
            .field("project_root", &self.project_root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerateError;
    use crate::host::MemoryFileSystem;
    use crate::model::TableDescriptor;
    use uuid::Uuid;

    fn tables() -> Vec<TableDescriptor> {
        vec![TableDescriptor::new("Menu", Uuid::from_u128(1)).with_entry("start", 1)]
    }

    fn regenerator(fs: MemoryFileSystem) -> Regenerator<Vec<TableDescriptor>, MemoryFileSystem> {
        Regenerator::new(GeneratorOptions::default(), "project", tables(), fs)
    }

    #[test]
    fn test_manual_trigger_writes_to_target_folder() {
        let mut regen = regenerator(MemoryFileSystem::new());
        let settings = Settings::default();

        let report = regen.handle(&Trigger::Manual, &settings).unwrap();

        assert_eq!(report.path, PathBuf::from("project/Assets/LocaleClasses.g.cs"));
        assert!(regen.file_system().file(&report.path).is_some());
    }

    #[test]
    fn test_entry_triggers_use_settings_prefix() {
        let mut regen = regenerator(MemoryFileSystem::new());
        let settings = Settings {
            prefix: "Txt".to_string(),
            ..Settings::default()
        };

        let report = regen
            .handle(
                &Trigger::EntryAdded {
                    table: "Menu".to_string(),
                    key: "start".to_string(),
                },
                &settings,
            )
            .unwrap();

        assert!(report.content.contains("public static class TxtMenu"));
    }

    #[test]
    fn test_folder_change_removes_stale_output() {
        let old_path = PathBuf::from("project/Assets/LocaleClasses.g.cs");
        let mut regen = regenerator(MemoryFileSystem::new().with_file(&old_path, "old"));

        let trigger = Trigger::TargetFolderChanged {
            old: PathBuf::from("Assets"),
            new: PathBuf::from("Assets/Generated"),
        };
        let report = regen.handle(&trigger, &Settings::default()).unwrap();

        assert_eq!(
            report.path,
            PathBuf::from("project/Assets/Generated/LocaleClasses.g.cs")
        );
        assert!(regen.file_system().file(&old_path).is_none());
        assert!(regen.file_system().file(&report.path).is_some());
    }

    #[test]
    fn test_folder_change_without_migration_keeps_old_file() {
        let old_path = PathBuf::from("project/Assets/LocaleClasses.g.cs");
        let mut regen = Regenerator::new(
            GeneratorOptions::default().with_folder_migration(false),
            "project",
            tables(),
            MemoryFileSystem::new().with_file(&old_path, "old"),
        );

        let trigger = Trigger::TargetFolderChanged {
            old: PathBuf::from("Assets"),
            new: PathBuf::from("Scripts"),
        };
        regen.handle(&trigger, &Settings::default()).unwrap();

        assert_eq!(regen.file_system().file(&old_path), Some("old"));
    }

    #[test]
    fn test_folder_change_with_missing_old_file_still_generates() {
        let mut regen = regenerator(MemoryFileSystem::new());
        let trigger = Trigger::TargetFolderChanged {
            old: PathBuf::from("Nowhere"),
            new: PathBuf::from("Assets"),
        };

        assert!(regen.handle(&trigger, &Settings::default()).is_ok());
    }

    #[test]
    fn test_failure_is_returned_not_fatal() {
        let mut regen = regenerator(MemoryFileSystem::new().read_only());

        let err = regen
            .handle(&Trigger::Manual, &Settings::default())
            .unwrap_err();
        assert!(matches!(err, GenerateError::CreateDir { .. }));

        // A second trigger runs normally and fails the same way.
        assert!(regen.handle(&Trigger::Manual, &Settings::default()).is_err());
    }

    #[test]
    fn test_trigger_from_event() {
        let event = TableEvent::EntryRemoved {
            table: "Menu".to_string(),
            table_id: Uuid::nil(),
            key: "quit".to_string(),
            entry_id: 2,
        };
        let trigger = Trigger::from(event);
        assert_eq!(trigger.to_string(), "entry 'quit' removed from 'Menu'");
    }
}
