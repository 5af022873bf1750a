// Helpers for the executable itself: locating it in the extracted tree,
// setting permission bits, and running its version probe.

use crate::log_debug;
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Recursively searches `dir` for a regular file named exactly `file_name`.
///
/// Release archives may put the binary at the root or inside a versioned
/// folder; the shallowest match wins.
pub fn find_executable(dir: &Path, file_name: &str) -> Option<PathBuf> {
    log_debug!(
        "[Fetch] Searching {:?} for '{}'",
        dir.to_string_lossy().yellow(),
        file_name.cyan()
    );

    walkdir::WalkDir::new(dir)
        .sort_by_key(|entry| entry.file_name().to_os_string())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .min_by_key(|entry| entry.depth())
        .map(|entry| entry.into_path())
}

/// Sets `rwxr-xr-x` on Unix. No-op elsewhere.
pub fn make_executable(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Runs `<path> --version` and returns its trimmed standard output.
///
/// # Returns
/// * `Err(String)` when the binary cannot be spawned or exits unsuccessfully.
pub fn probe_version(path: &Path) -> Result<String, String> {
    log_debug!("[Install] Probing {} --version", path.display());

    let output = Command::new(path)
        .arg("--version")
        .output()
        .map_err(|e| format!("could not run '{} --version': {}", path.display(), e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "'{} --version' exited with {}: {}",
            path.display(),
            output.status,
            stderr.trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
