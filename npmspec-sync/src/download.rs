//! Source tarball download.
//!
//! Idempotent on file existence: if `<dst>/<basename of url>` exists the
//! transport is never called. The body is streamed into a temp file next to
//! the target and renamed into place only once complete, so the final name
//! never refers to a partial download.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use npmspec_core::atomic;
use tempfile::NamedTempFile;

use crate::error::{io_err, SyncError};
use crate::transport::Transport;

/// Outcome of [`download_artifact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    /// The file was already there; nothing was fetched.
    Present { path: PathBuf },
    /// The body was streamed to `path`.
    Downloaded { path: PathBuf, bytes: u64 },
    /// `--dry` mode: the file *would* have been downloaded.
    WouldDownload { path: PathBuf },
}

/// Local file name for `url`: the last path segment, query and fragment
/// stripped.
pub fn artifact_file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Download `url` into `dst` unless a file of the same name is present.
pub fn download_artifact(
    transport: &dyn Transport,
    url: &str,
    dst: &Path,
    dry_run: bool,
) -> Result<DownloadResult, SyncError> {
    let path = dst.join(artifact_file_name(url));
    if path.exists() {
        tracing::debug!("already downloaded: {}", path.display());
        return Ok(DownloadResult::Present { path });
    }

    if dry_run {
        tracing::info!("[dry-run] would download: {url}");
        return Ok(DownloadResult::WouldDownload { path });
    }

    let tmp = NamedTempFile::new_in(dst).map_err(|e| io_err(dst, e))?;
    let mut sink = BufWriter::new(tmp);
    let bytes = transport.download(url, &mut sink)?;
    sink.flush().map_err(|e| io_err(&path, e))?;
    let tmp = sink.into_inner().map_err(|e| io_err(&path, e.into_error()))?;
    atomic::persist(tmp, &path)?;

    tracing::info!("downloaded: {} ({bytes} bytes)", path.display());
    Ok(DownloadResult::Downloaded { path, bytes })
}
