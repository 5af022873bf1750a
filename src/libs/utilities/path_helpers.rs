// Path resolution: `~` expansion and the OS-specific default install
// directories used by the install-directory policy.

use crate::log_debug;
use crate::schemas::platform::Os;
use colored::Colorize;
use std::path::PathBuf;

/// Expands a leading `~` to the home directory.
/// Paths without `~`, or when the home directory is unknown, are returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// The per-user binary directory for `os`.
///
/// * Linux / macOS: `~/.local/bin`
/// * Windows: `%LOCALAPPDATA%\chrysalis\bin`
pub fn user_bin_dir(os: Os) -> Option<PathBuf> {
    let dir = match os {
        Os::Linux | Os::Darwin => dirs::home_dir()?.join(".local").join("bin"),
        Os::Windows => dirs::data_local_dir()?.join("chrysalis").join("bin"),
    };
    log_debug!("[Install] Per-user directory: {}", dir.display().to_string().cyan());
    Some(dir)
}

/// The system-wide binary directory for `os`. Windows has none we write to.
pub fn system_bin_dir(os: Os) -> Option<PathBuf> {
    match os {
        Os::Linux | Os::Darwin => Some(PathBuf::from("/usr/local/bin")),
        Os::Windows => None,
    }
}
