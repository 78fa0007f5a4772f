//! # locale-gen-cli
//!
//! Command-line front end for locale-gen.
//!
//! Reads string tables from a directory of `.json` / `.toml` files and
//! writes the generated C# accessor classes into the configured target
//! folder, either once or on every table change.
//!
//! ## Modules
//!
//! - [`config`] - `locale-gen.toml` loading and CLI overrides
//! - [`scanner`] - Table file discovery and parsing
//! - [`writer`] - Atomic local file output with dry-run
//! - [`watcher`] - Debounced table directory watching
//! - [`error`] - CLI error types

pub mod config;
pub mod error;
pub mod scanner;
pub mod watcher;
pub mod writer;

pub use config::{CliArgs, Config, ConfigManager, CONFIG_FILENAME};
pub use error::{CliError, CliResult};
pub use scanner::{DirectoryTableSource, TableFormat};
pub use watcher::{regenerate_on_change, BatchOutcome, FileWatcher, WatchEvent};
pub use writer::LocalFileSystem;
