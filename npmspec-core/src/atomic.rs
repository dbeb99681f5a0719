//! Replace-by-rename for files built up in a [`NamedTempFile`].
//!
//! `NamedTempFile` creates its file with mode 0600. Before the rename the
//! temp file takes the permissions of the file it replaces, or 0644 when the
//! target is new, so packaging files stay world-readable.

use std::fs::Permissions;
use std::io::ErrorKind;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{io_err, CoreError};

/// Rename `tmp` over `path`, keeping the permissions `path` had.
pub fn persist(tmp: NamedTempFile, path: &Path) -> Result<(), CoreError> {
    let perms = match std::fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(err) if err.kind() == ErrorKind::NotFound => new_file_permissions(),
        Err(err) => return Err(io_err(path, err)),
    };
    if let Some(perms) = perms {
        tmp.as_file()
            .set_permissions(perms)
            .map_err(|e| io_err(tmp.path(), e))?;
    }
    tmp.persist(path).map_err(|e| io_err(path, e.error))?;
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn mode(path: &Path) -> u32 {
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    fn tmp_with(dir: &Path, content: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new_in(dir).unwrap();
        tmp.write_all(content.as_bytes()).unwrap();
        tmp
    }

    #[test]
    fn new_file_is_world_readable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out");
        persist(tmp_with(dir.path(), "x"), &path).unwrap();
        assert_eq!(mode(&path), 0o644);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x");
    }

    #[test]
    fn replaced_file_keeps_its_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();

        persist(tmp_with(dir.path(), "new"), &path).unwrap();
        assert_eq!(mode(&path), 0o640);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
