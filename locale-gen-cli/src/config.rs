//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `locale-gen.toml` files
//! and merging with command-line arguments. Persisted user settings (target
//! folder, prefix) live separately in the settings file the configuration
//! points at.

use crate::error::{CliResult, ConfigError};
use locale_gen::generator::DEFAULT_FILE_NAME;
use locale_gen::GeneratorOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "locale-gen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project layout.
    pub project: ProjectConfig,

    /// Table file discovery.
    pub tables: TablesConfig,

    /// Generator behaviour.
    pub generator: GeneratorConfig,

    /// Watch mode.
    pub watch: WatchConfig,
}

/// Project layout configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project root. Target folders must be inside it.
    pub root: PathBuf,

    /// Settings file, relative to the project root.
    pub settings: PathBuf,
}

/// Table discovery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    /// Directory holding table files, relative to the project root.
    pub dir: PathBuf,

    /// Optional glob, matched against paths relative to `dir`.
    pub filter: Option<String>,
}

/// Generator configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Generated file name.
    pub file_name: String,

    /// Delete the previous file when the target folder changes.
    pub support_folder_migration: bool,
}

/// Watch mode configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce duration in milliseconds.
    pub debounce_ms: u64,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            settings: PathBuf::from("ProjectSettings/LocaleGenerator.toml"),
        }
    }
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("Localization"),
            filter: None,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            support_folder_migration: true,
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

impl Config {
    /// Project root, canonicalized when it exists.
    pub fn project_root(&self) -> PathBuf {
        std::fs::canonicalize(&self.project.root).unwrap_or_else(|_| self.project.root.clone())
    }

    /// Absolute settings file location.
    pub fn settings_path(&self) -> PathBuf {
        self.project_root().join(&self.project.settings)
    }

    /// Absolute table directory.
    pub fn tables_dir(&self) -> PathBuf {
        self.project_root().join(&self.tables.dir)
    }

    /// Generator options derived from this configuration.
    ///
    /// The prefix is left at its default; it comes from the settings file
    /// at generation time.
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions::default()
            .with_file_name(self.generator.file_name.clone())
            .with_folder_migration(self.generator.support_folder_migration)
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> CliResult<()> {
        let file_name = Path::new(&self.generator.file_name);
        if self.generator.file_name.is_empty() || file_name.components().count() != 1 {
            return Err(ConfigError::invalid_value(
                "generator.file_name",
                "must be a plain file name",
            )
            .into());
        }

        if let Some(filter) = &self.tables.filter {
            glob::Pattern::new(filter)
                .map_err(|e| ConfigError::invalid_value("tables.filter", e.to_string()))?;
        }

        Ok(())
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref root) = args.project_root {
            config.project.root = root.clone();
        }

        if let Some(ref tables) = args.tables {
            config.tables.dir = tables.clone();
        }

        if let Some(ref filter) = args.filter {
            config.tables.filter = Some(filter.clone());
        }

        if let Some(ref file_name) = args.file_name {
            config.generator.file_name = file_name.clone();
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# locale-gen configuration file

[project]
# Project root; the target folder must be inside it
root = "."

# Persisted settings (target folder, class prefix), relative to the root
settings = "ProjectSettings/LocaleGenerator.toml"

[tables]
# Directory with one .json or .toml file per string table
dir = "Localization"

# Only load table files matching this glob (relative to dir)
# filter = "**/*.json"

[generator]
# Name of the generated C# file inside the target folder
file_name = "LocaleClasses.g.cs"

# Delete the file at the old location when the target folder changes
support_folder_migration = true

[watch]
# Debounce duration for file change events, in milliseconds
debounce_ms = 500
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Project root override.
    pub project_root: Option<PathBuf>,

    /// Table directory override.
    pub tables: Option<PathBuf>,

    /// Table filter override.
    pub filter: Option<String>,

    /// Output file name override.
    pub file_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project.root, PathBuf::from("."));
        assert_eq!(
            config.project.settings,
            PathBuf::from("ProjectSettings/LocaleGenerator.toml")
        );
        assert_eq!(config.tables.dir, PathBuf::from("Localization"));
        assert_eq!(config.tables.filter, None);
        assert_eq!(config.generator.file_name, "LocaleClasses.g.cs");
        assert!(config.generator.support_folder_migration);
        assert_eq!(config.watch.debounce_ms, 500);
    }

    #[test]
    fn test_default_content_parses_to_defaults() {
        let config: Config = toml::from_str(ConfigManager::default_config_content()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.tables.dir, defaults.tables.dir);
        assert_eq!(config.generator.file_name, defaults.generator.file_name);
        assert_eq!(config.watch.debounce_ms, defaults.watch.debounce_ms);
    }

    #[test]
    fn test_merge_cli_args_override() {
        let config = Config::default();
        let args = CliArgs {
            tables: Some(PathBuf::from("Tables")),
            file_name: Some("Strings.g.cs".to_string()),
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(config, &args);
        assert_eq!(merged.tables.dir, PathBuf::from("Tables"));
        assert_eq!(merged.generator.file_name, "Strings.g.cs");
        assert_eq!(merged.project.root, PathBuf::from("."));
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[project]
root = "game"

[tables]
dir = "Loc"
filter = "ui/*.json"

[generator]
file_name = "Texts.g.cs"
support_folder_migration = false
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.project.root, PathBuf::from("game"));
        assert_eq!(config.tables.filter.as_deref(), Some("ui/*.json"));
        assert!(!config.generator.support_folder_migration);
        assert_eq!(config.watch.debounce_ms, 500);

        let options = config.generator_options();
        assert_eq!(options.file_name, "Texts.g.cs");
        assert!(!options.support_folder_migration);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.generator.file_name = "nested/File.cs".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tables.filter = Some("[".to_string());
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = ConfigManager::load(Some(Path::new("/nonexistent/locale-gen.toml"))).unwrap();
        assert_eq!(config.tables.dir, PathBuf::from("Localization"));
    }
}
