// Defines where the executable ends up once the install-directory policy has
// picked a directory.

use std::fmt;
use std::path::PathBuf;

/// Which step of the install-directory policy produced the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallScope {
    /// The directory named by `--install-dir` / `CHRYSALIS_INSTALL_DIR`.
    Override,
    /// The per-user binary directory (e.g. `~/.local/bin`).
    User,
    /// The system-wide binary directory, possibly written through `sudo`.
    System,
}

impl fmt::Display for InstallScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstallScope::Override => "override",
            InstallScope::User => "user",
            InstallScope::System => "system",
        };
        f.write_str(label)
    }
}

/// A chosen installation destination.
///
/// `directory` is known to exist and to accept the executable (directly, or
/// through elevation when `elevated` is set) before anything is moved into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub directory: PathBuf,
    pub executable_path: PathBuf,
    pub scope: InstallScope,
    pub elevated: bool,
}

impl InstallTarget {
    pub fn new(directory: PathBuf, executable_name: &str, scope: InstallScope, elevated: bool) -> Self {
        let executable_path = directory.join(executable_name);
        Self {
            directory,
            executable_path,
            scope,
            elevated,
        }
    }
}
