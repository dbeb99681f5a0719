//! # npmspec-sync
//!
//! Registry cache, build service check, tarball download and the
//! create-or-update workflow.
//!
//! Build a [`Syncer`] over a [`Transport`] and call
//! [`Syncer::sync_package`] to bring one package directory up to the
//! registry's latest version, or [`Syncer::generate_spec`] to only render
//! its spec file.

pub mod cache;
pub mod diff;
pub mod download;
pub mod error;
pub mod obs;
pub mod orchestrator;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use cache::RegistryCache;
pub use download::DownloadResult;
pub use error::SyncError;
pub use obs::Tracking;
pub use orchestrator::{SyncOptions, SyncOutcome, Syncer, Target, WriteResult};
pub use transport::{Transport, TransportError, UreqTransport};
