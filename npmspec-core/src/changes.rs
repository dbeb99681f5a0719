//! `.changes` file handling.
//!
//! Entries are kept newest first. A new entry is prepended by writing it,
//! followed by the old contents, to a temp file in the same directory and
//! renaming that over the old file with the old file's permissions. The temp file is dropped (and deleted)
//! on every error path, so an interrupted run never leaves a truncated log.
//!
//! ```text
//! -------------------------------------------------------------------
//! Tue Mar 03 14:05:09 UTC 2026 - packager@example.org
//!
//! - Update to version 1.2.0:
//!
//! ```

use std::io::{ErrorKind, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::atomic;
use crate::error::{io_err, CoreError};

const SEPARATOR_WIDTH: usize = 67;
const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S UTC %Y";

/// A single change-log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub version: String,
}

impl ChangeEntry {
    /// Entry stamped with the current UTC time.
    pub fn now(author: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            author: author.into(),
            version: version.into(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{rule}\n{stamp} - {author}\n\n- Update to version {version}:\n\n",
            rule = "-".repeat(SEPARATOR_WIDTH),
            stamp = self.timestamp.format(TIMESTAMP_FORMAT),
            author = self.author,
            version = self.version,
        )
    }
}

/// Prepend `entry` to the change-log at `path`, creating it if missing.
pub fn prepend_entry(path: &Path, entry: &ChangeEntry) -> Result<(), CoreError> {
    let existing = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
        Err(err) => return Err(io_err(path, err)),
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| io_err(dir, e))?;
    tmp.write_all(entry.render().as_bytes())
        .and_then(|()| tmp.write_all(existing.as_bytes()))
        .and_then(|()| tmp.flush())
        .map_err(|e| io_err(tmp.path(), e))?;
    atomic::persist(tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn entry(version: &str) -> ChangeEntry {
        ChangeEntry {
            timestamp: Utc.with_ymd_and_hms(2015, 7, 9, 8, 3, 5).unwrap(),
            author: "packager@example.org".to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn entry_format() {
        let expected = format!(
            "{}\nThu Jul 09 08:03:05 UTC 2015 - packager@example.org\n\n- Update to version 1.2.0:\n\n",
            "-".repeat(67)
        );
        assert_eq!(entry("1.2.0").render(), expected);
    }

    #[test]
    fn creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodejs-foo.changes");
        prepend_entry(&path, &entry("1.0.0")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), entry("1.0.0").render());
    }

    #[test]
    fn newest_entry_comes_first() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodejs-foo.changes");
        prepend_entry(&path, &entry("1.0.0")).unwrap();
        prepend_entry(&path, &entry("1.1.0")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}{}", entry("1.1.0").render(), entry("1.0.0").render()));
    }

    #[cfg(unix)]
    #[test]
    fn prepend_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodejs-foo.changes");
        std::fs::write(&path, "older\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        prepend_entry(&path, &entry("1.1.0")).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodejs-foo.changes");
        prepend_entry(&path, &entry("1.0.0")).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("nodejs-foo.changes")]);
    }

    #[test]
    fn missing_directory_is_an_error_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone").join("nodejs-foo.changes");
        let err = prepend_entry(&path, &entry("1.0.0")).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
        assert!(!path.exists());
    }
}
