//! Error types for npmspec-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from descriptor, range, metadata and change-log
/// operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A registry range this translator does not model (intervals, x-ranges,
    /// unions, bare versions...).
    #[error("unsupported version specification '{range}' for dependency '{dependency}'")]
    UnsupportedRange { dependency: String, range: String },

    /// A tag the caller requires is absent from the spec preamble.
    #[error("{tag} not defined in {path}")]
    MissingField { tag: String, path: PathBuf },

    /// The registry document has no usable `dist-tags.latest` entry.
    #[error("registry document for '{package}' has no latest version: {reason}")]
    MissingLatest { package: String, reason: String },

    /// JSON (de)serialization error on registry metadata.
    #[error("registry metadata JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error on config load, with the offending file.
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Convenience constructor for [`CoreError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
