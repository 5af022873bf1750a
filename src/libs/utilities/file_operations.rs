// File system helpers used by the installer: writability probes and moving
// the staged executable into its final location.

use crate::{log_debug, log_warn};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::Path;

/// Checks that `dir` is an existing directory we can create files in.
///
/// Metadata alone is not reliable (ACLs, read-only mounts), so this creates
/// and immediately drops a probe file.
pub fn is_writable_dir(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    match tempfile::Builder::new()
        .prefix(".chrysalis-write-probe")
        .tempfile_in(dir)
    {
        Ok(_) => true,
        Err(e) => {
            log_debug!("[Install] {} is not writable: {}", dir.display(), e);
            false
        }
    }
}

/// Creates `dir` (and its parents) unless it already exists.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    log_debug!("[Install] Creating directory {}", dir.display().to_string().cyan());
    fs::create_dir_all(dir)
}

/// Moves `from` to `to`, replacing any existing file at `to`.
///
/// A plain `rename` when both paths share a filesystem. Across filesystems the
/// bytes are copied into a temporary file next to `to` which is then renamed
/// over it, so `to` is never observed half-written; the source is removed
/// afterwards.
pub fn move_into_place(from: &Path, to: &Path) -> io::Result<()> {
    log_debug!(
        "[Install] Moving {:?} to {:?}",
        from.to_string_lossy().yellow(),
        to.to_string_lossy().cyan()
    );

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log_debug!("[Install] Cross-device move, copying through the destination directory: {}", e);
            let parent = to.parent().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent directory")
            })?;

            let mut staged = tempfile::Builder::new()
                .prefix(".chrysalis-staged")
                .tempfile_in(parent)?;
            io::copy(&mut fs::File::open(from)?, staged.as_file_mut())?;
            staged.as_file().sync_all()?;
            staged.persist(to).map_err(|e| e.error)?;

            if let Err(e) = fs::remove_file(from) {
                log_warn!("[Install] Could not remove staged file {}: {}", from.display(), e);
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writable_probe_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_writable_dir(dir.path()));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_directory_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_writable_dir(&dir.path().join("absent")));
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/bin");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn move_replaces_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("staged");
        let to = dir.path().join("chrysalis");
        fs::write(&from, b"new").unwrap();
        fs::write(&to, b"old").unwrap();

        move_into_place(&from, &to).unwrap();
        assert_eq!(fs::read(&to).unwrap(), b"new");
        assert!(!from.exists());
    }
}
