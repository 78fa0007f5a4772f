//! # locale-gen
//!
//! Generates a C# source file with one strongly-named accessor per
//! localization table entry, so game code refers to translations by
//! identifier instead of by string lookup.
//!
//! ## Architecture
//!
//! - [`sanitize`] - Identifier sanitization under a small policy
//! - [`model`] - Table and entry snapshot types
//! - [`render`] - Pure rendering of the C# document
//! - [`generator`] - Rendering plus the file write and host import
//! - [`trigger`] - Manual, content and folder-change triggers
//! - [`settings`] - Persisted target folder and class prefix
//! - [`events`] - Entry-level diffing of table snapshots
//! - [`host`] - Collaborator traits and an in-memory file system
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust
//! use locale_gen::{LocaleGenerator, TableDescriptor};
//! use uuid::Uuid;
//!
//! let tables = vec![TableDescriptor::new("UI Texts", Uuid::nil())
//!     .with_entry("ok", 1)
//!     .with_entry("cancel", 2)];
//!
//! let document = LocaleGenerator::default().render(&tables);
//! let class = document.class("Locale_UITexts").unwrap();
//! assert_eq!(class.accessors, vec!["Cancel", "Ok"]);
//! ```

pub mod error;
pub mod events;
pub mod generator;
pub mod host;
pub mod model;
pub mod render;
pub mod sanitize;
pub mod settings;
pub mod trigger;

// Re-export main types for convenience
pub use error::{GenerateError, GenerateResult, SettingsError, SourceError};
pub use events::{diff_snapshots, TableEvent};
pub use generator::{CheckOutcome, GenerateReport, GeneratorOptions, LocaleGenerator};
pub use host::{MemoryFileSystem, OutputFileSystem, TableSource, WriteOutcome};
pub use model::{EntryDescriptor, TableDescriptor};
pub use render::{GeneratedClass, GeneratedDocument};
pub use sanitize::{sanitize, SanitizePolicy};
pub use settings::{Settings, SettingsStore, TargetFolderChange};
pub use trigger::{Regenerator, Trigger};
