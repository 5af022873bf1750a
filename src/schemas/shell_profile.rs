// Defines the shell-side data structures used when making the install
// directory reachable from the user's interactive shell.

use crate::schemas::platform::Os;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Interactive shells the installer knows how to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    Bash,
    Zsh,
    Fish,
    /// `sh`, `dash`, `ksh` and anything unrecognized: configured via `~/.profile`.
    Posix,
    PowerShell,
}

impl ShellKind {
    /// Maps a shell program (`/bin/zsh`, `bash`, `fish.exe`) to a shell kind.
    pub fn from_program(program: &str) -> Self {
        let name = Path::new(program.trim())
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellKind::Bash,
            "zsh" => ShellKind::Zsh,
            "fish" => ShellKind::Fish,
            "pwsh" | "powershell" => ShellKind::PowerShell,
            _ => ShellKind::Posix,
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ShellKind::Bash => "bash",
            ShellKind::Zsh => "zsh",
            ShellKind::Fish => "fish",
            ShellKind::Posix => "sh",
            ShellKind::PowerShell => "powershell",
        };
        f.write_str(label)
    }
}

/// The slice of the process environment the path configurer depends on.
///
/// Kept as an explicit value so the read-check-write protocol on shell
/// configuration files can run against a temporary home in tests.
#[derive(Debug, Clone)]
pub struct ShellEnvironment {
    pub home: PathBuf,
    /// Value of `$SHELL`, if set.
    pub shell: Option<String>,
    /// Value of `$ZDOTDIR`, if set.
    pub zdotdir: Option<PathBuf>,
    /// Value of `$PATH`, if set.
    pub path_var: Option<OsString>,
    pub host_os: Os,
}

impl ShellEnvironment {
    /// Captures the current process environment.
    /// Returns `None` when the home directory cannot be determined.
    pub fn from_process(host_os: Os) -> Option<Self> {
        Some(Self {
            home: dirs::home_dir()?,
            shell: std::env::var("SHELL").ok().filter(|s| !s.trim().is_empty()),
            zdotdir: std::env::var_os("ZDOTDIR").map(PathBuf::from),
            path_var: std::env::var_os("PATH"),
            host_os,
        })
    }

    /// The user's interactive shell. Windows without `$SHELL` means PowerShell.
    pub fn shell_kind(&self) -> ShellKind {
        match (&self.shell, self.host_os) {
            (Some(program), _) => ShellKind::from_program(program),
            (None, Os::Windows) => ShellKind::PowerShell,
            (None, _) => ShellKind::Posix,
        }
    }

    /// `true` when `dir` is already one of the `$PATH` entries.
    pub fn path_contains(&self, dir: &Path) -> bool {
        let Some(path_var) = &self.path_var else {
            return false;
        };
        std::env::split_paths(path_var).any(|entry| same_directory(&entry, dir))
    }
}

fn same_directory(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// What the path configurer found out about the user's shell setup.
#[derive(Debug, Clone)]
pub struct EnvironmentProfile {
    pub shell_kind: ShellKind,
    /// Ordered candidates; the first writable one receives the block.
    pub candidate_config_files: Vec<PathBuf>,
    /// `true` when any candidate already carries the idempotency marker.
    pub configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(shell: Option<&str>, host_os: Os) -> ShellEnvironment {
        ShellEnvironment {
            home: PathBuf::from("/home/user"),
            shell: shell.map(str::to_string),
            zdotdir: None,
            path_var: None,
            host_os,
        }
    }

    #[test]
    fn shell_kind_comes_from_program_basename() {
        assert_eq!(ShellKind::from_program("/bin/zsh"), ShellKind::Zsh);
        assert_eq!(ShellKind::from_program("/usr/local/bin/bash"), ShellKind::Bash);
        assert_eq!(ShellKind::from_program("/opt/homebrew/bin/fish"), ShellKind::Fish);
        assert_eq!(ShellKind::from_program("pwsh.exe"), ShellKind::PowerShell);
        assert_eq!(ShellKind::from_program("/bin/dash"), ShellKind::Posix);
        assert_eq!(ShellKind::from_program("/usr/bin/nu"), ShellKind::Posix);
    }

    #[test]
    fn missing_shell_variable_depends_on_host() {
        assert_eq!(env_with(None, Os::Windows).shell_kind(), ShellKind::PowerShell);
        assert_eq!(env_with(None, Os::Linux).shell_kind(), ShellKind::Posix);
        assert_eq!(env_with(Some("/bin/zsh"), Os::Darwin).shell_kind(), ShellKind::Zsh);
    }

    #[test]
    fn path_contains_matches_exact_entries() {
        let mut env = env_with(Some("/bin/bash"), Os::Linux);
        env.path_var = Some(std::env::join_paths(["/usr/bin", "/home/user/.local/bin"]).unwrap());
        assert!(env.path_contains(Path::new("/home/user/.local/bin")));
        assert!(!env.path_contains(Path::new("/home/user/bin")));
    }
}
