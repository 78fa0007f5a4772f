//! Persistent generator settings.
//!
//! [`SettingsStore`] is an explicitly constructed service: the composition
//! root opens it, registers listeners and passes it around. Changing the
//! target folder notifies every listener synchronously, before the new value
//! is persisted, so the previous output can still be located and removed.

use crate::error::SettingsError;
use crate::sanitize::{sanitize, SanitizePolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Default folder, relative to the project root, for the generated file.
pub const DEFAULT_TARGET_FOLDER: &str = "Assets";

/// Default prefix for generated table classes.
pub const DEFAULT_PREFIX: &str = "Locale_";

/// Policy a prefix must satisfy. Hyphens are folded into word boundaries
/// because the prefix starts an emitted C# class name.
const PREFIX_POLICY: SanitizePolicy = SanitizePolicy::PROPERTY_NAME;

/// Current settings values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Output folder, relative to the project root.
    pub target_folder: PathBuf,

    /// Class name prefix.
    pub prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_folder: PathBuf::from(DEFAULT_TARGET_FOLDER),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// On-disk form. Missing fields are filled with defaults once, on open.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_folder: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
}

/// Notification sent to listeners when the target folder moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFolderChange {
    /// Folder the output currently lives in.
    pub old: PathBuf,

    /// Folder the output is moving to.
    pub new: PathBuf,
}

type Listener = Box<dyn FnMut(&TargetFolderChange, &Settings)>;

/// Settings service backed by a TOML file.
pub struct SettingsStore {
    path: PathBuf,
    project_root: PathBuf,
    settings: Settings,
    listeners: Vec<Listener>,
}

impl fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("path", &self.path)
            .field("project_root", &self.project_root)
            .field("settings", &self.settings)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SettingsStore {
    /// Open the settings file at `path`, creating it if needed.
    ///
    /// Defaults are applied for any missing value and written back
    /// immediately, so they are only ever applied once.
    pub fn open(
        path: impl Into<PathBuf>,
        project_root: impl Into<PathBuf>,
    ) -> Result<Self, SettingsError> {
        let path = path.into();
        let project_root = project_root.into();

        let stored = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| SettingsError::Io {
                path: path.clone(),
                source: e,
            })?;
            toml::from_str::<StoredSettings>(&content).map_err(|e| SettingsError::InvalidToml {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            StoredSettings::default()
        };

        let mut needs_save = stored.target_folder.is_none() || stored.prefix.is_none();
        let defaults = Settings::default();
        let prefix = match stored.prefix {
            Some(raw) => match sanitize(&raw, PREFIX_POLICY) {
                Some(prefix) if prefix == raw => prefix,
                Some(prefix) => {
                    warn!(stored = %raw, prefix = %prefix, "sanitizing stored class prefix");
                    needs_save = true;
                    prefix
                }
                None => {
                    warn!(stored = %raw, "stored class prefix is unusable, using the default");
                    needs_save = true;
                    defaults.prefix
                }
            },
            None => defaults.prefix,
        };
        let settings = Settings {
            target_folder: stored.target_folder.unwrap_or(defaults.target_folder),
            prefix,
        };

        let store = Self {
            path,
            project_root,
            settings,
            listeners: Vec::new(),
        };

        if needs_save {
            info!(path = %store.path.display(), "writing default or repaired settings");
            store.save()?;
        }

        Ok(store)
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Output folder, relative to the project root.
    pub fn target_folder(&self) -> &Path {
        &self.settings.target_folder
    }

    /// Class name prefix.
    pub fn prefix(&self) -> &str {
        &self.settings.prefix
    }

    /// Root every target folder must live under.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Location of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a listener for target folder changes.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&TargetFolderChange, &Settings) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Move the output to `folder`.
    ///
    /// `folder` may be relative to the project root or an absolute path
    /// inside it. Returns `Ok(false)` when the folder is unchanged. Listeners
    /// run before the new value is persisted.
    pub fn set_target_folder(&mut self, folder: impl AsRef<Path>) -> Result<bool, SettingsError> {
        let folder = self.project_relative(folder.as_ref())?;

        if folder == self.settings.target_folder {
            debug!(folder = %folder.display(), "target folder unchanged");
            return Ok(false);
        }

        let change = TargetFolderChange {
            old: self.settings.target_folder.clone(),
            new: folder.clone(),
        };

        for listener in self.listeners.iter_mut() {
            listener(&change, &self.settings);
        }

        let updated = Settings {
            target_folder: folder,
            ..self.settings.clone()
        };
        if let Err(e) = self.write(&updated) {
            // Listeners have already moved the output; the old value stays
            // current so the next call notifies them again.
            error!(
                old = %change.old.display(),
                new = %change.new.display(),
                error = %e,
                "output moved but settings were not saved; set the target folder again to repair"
            );
            return Err(e);
        }
        self.settings = updated;

        info!(
            old = %change.old.display(),
            new = %change.new.display(),
            "target folder changed"
        );
        Ok(true)
    }

    /// Set the class prefix.
    ///
    /// The value is sanitized like a class name, with hyphens folded into
    /// word boundaries, and stored in its sanitized form. Input that
    /// sanitizes to nothing is rejected and the previous prefix stays in
    /// place.
    pub fn set_prefix(&mut self, raw: &str) -> Result<&str, SettingsError> {
        let Some(prefix) = sanitize(raw, PREFIX_POLICY) else {
            warn!(value = %raw, "rejected class prefix");
            return Err(SettingsError::InvalidPrefix {
                value: raw.to_string(),
            });
        };

        self.settings.prefix = prefix;
        self.save()?;
        Ok(&self.settings.prefix)
    }

    /// Write the current settings to disk.
    pub fn save(&self) -> Result<(), SettingsError> {
        self.write(&self.settings)
    }

    fn write(&self, settings: &Settings) -> Result<(), SettingsError> {
        let stored = StoredSettings {
            target_folder: Some(settings.target_folder.clone()),
            prefix: Some(settings.prefix.clone()),
        };
        let content =
            toml::to_string_pretty(&stored).map_err(|e| SettingsError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| SettingsError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(&self.path, content).map_err(|e| SettingsError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Resolve `folder` to a normalized path relative to the project root.
    fn project_relative(&self, folder: &Path) -> Result<PathBuf, SettingsError> {
        let outside = || SettingsError::FolderOutsideProject {
            folder: folder.to_path_buf(),
            root: self.project_root.clone(),
        };

        let relative = if folder.is_absolute() {
            folder.strip_prefix(&self.project_root).map_err(|_| outside())?
        } else {
            folder
        };

        let mut normalized = PathBuf::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(outside())
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            normalized.push(".");
        }

        Ok(normalized)
    }
}
