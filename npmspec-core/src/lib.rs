//! npmspec core library: spec file editing, range translation, registry
//! metadata, change-log and configuration.
//!
//! Public API surface:
//! - [`descriptor`]: [`SpecFile`], the bounded preamble editor
//! - [`range`]: npm range -> RPM comparator translation
//! - [`npm`]: registry document and version metadata
//! - [`changes`]: newest-first `.changes` entries
//! - [`atomic`]: temp file + rename that keeps file permissions
//! - [`config`]: `~/.npmspec/config.yaml`
//! - [`error`]: [`CoreError`]

pub mod atomic;
pub mod changes;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod npm;
pub mod range;

pub use changes::ChangeEntry;
pub use config::Config;
pub use descriptor::SpecFile;
pub use error::CoreError;
pub use npm::{PackageDocument, PackageName, VersionMetadata};
pub use range::{translate, Requirement};
