//! Error types for generation, settings and table sources.
//!
//! Sanitization never fails: an unusable name is a skip, not an error. The
//! types here cover the recoverable failures around it: I/O while writing
//! the output, rejected settings input, and unreadable tables.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Error while producing the output file.
///
/// Always recoverable: re-running generation after fixing the cause is
/// enough.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Failed to create the output directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the output file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the existing output file while checking it.
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table source could not produce a snapshot.
    #[error("Failed to list string tables: {0}")]
    Source(#[from] SourceError),
}

/// Error while reading the table snapshot.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The table location does not exist.
    #[error("Table directory not found: {path}")]
    NotFound { path: PathBuf },

    /// A table file could not be read.
    #[error("Failed to read table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A table file could not be parsed.
    #[error("Invalid table in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Directory traversal failed.
    #[error("Walk error: {0}")]
    Walk(String),
}

/// Error while reading, validating or persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The prefix sanitizes to nothing. The previous prefix is kept.
    #[error("Invalid class prefix '{value}': no usable identifier characters")]
    InvalidPrefix { value: String },

    /// The target folder is not inside the project.
    #[error("Target folder {folder} is outside the project root {root}")]
    FolderOutsideProject { folder: PathBuf, root: PathBuf },

    /// Failed to read or write the settings file.
    #[error("Failed to access settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// The settings could not be serialized.
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),
}

impl SourceError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create a parse error.
    pub fn parse(path: PathBuf, message: impl Into<String>) -> Self {
        Self::Parse {
            path,
            message: message.into(),
        }
    }
}

impl SettingsError {
    /// Whether this error is rejected user input rather than an I/O problem.
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidPrefix { .. } | Self::FolderOutsideProject { .. }
        )
    }
}

impl GenerateError {
    /// Path the failed operation was working on, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::CreateDir { path, .. }
            | Self::WriteFile { path, .. }
            | Self::ReadFile { path, .. } => Some(path),
            Self::Source(_) => None,
        }
    }
}
