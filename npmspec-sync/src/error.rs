//! Error types for npmspec-sync.

use std::path::PathBuf;

use thiserror::Error;

use npmspec_core::CoreError;
use npmspec_renderer::RenderError;

use crate::transport::TransportError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Spec file, range, metadata or change-log error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Registry, build service or download request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (registry cache).
    #[error("registry cache JSON error at {path}: {source}")]
    CacheJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Build service answered with XML we could not parse.
    #[error("build service XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The registry answered "not modified" to an unconditional request.
    #[error("registry returned 304 for '{package}' but nothing is cached")]
    UnexpectedNotModified { package: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
