// PathConfigurer: makes the install directory reachable from the user's
// interactive shell.
//
// Read-check-write protocol on the shell configuration files:
//   1. every candidate file for the detected shell is scanned for MARKER;
//      if any has it, nothing is written ("already configured")
//   2. if the directory is already on $PATH, nothing is written
//   3. otherwise one marked block is appended to the first writable candidate
//
// At most one file is written per run. When none is writable the lines to add
// are printed for the user and the run still succeeds.

use crate::libs::errors::InstallWarning;
use crate::libs::utilities::file_operations;
use crate::schemas::platform::Os;
use crate::schemas::shell_profile::{EnvironmentProfile, ShellEnvironment, ShellKind};
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Opening line of the block appended to a shell configuration file.
pub const MARKER: &str = "# >>> chrysalis installer: PATH >>>";
/// Closing line of the block.
pub const END_MARKER: &str = "# <<< chrysalis installer: PATH <<<";

/// What the path configurer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    /// A previous run already added the block to `file`.
    AlreadyConfigured { file: PathBuf },
    /// The install directory is already on `$PATH`.
    AlreadyOnPath,
    /// The block was appended to `file`; `apply_command` loads it into the current session.
    Configured { file: PathBuf, apply_command: String },
    /// Nothing was written; the user has to add `lines` to their shell configuration.
    Manual {
        lines: Vec<String>,
        warning: Option<InstallWarning>,
    },
}

/// Ordered configuration files for `kind`; the first writable one is used.
pub fn candidate_files(kind: ShellKind, env: &ShellEnvironment) -> Vec<PathBuf> {
    let home = &env.home;
    match kind {
        ShellKind::Zsh => {
            let zdotdir = env.zdotdir.clone().unwrap_or_else(|| home.clone());
            vec![zdotdir.join(".zshrc"), zdotdir.join(".zprofile")]
        }
        ShellKind::Bash => match env.host_os {
            // Terminal.app starts login shells, which read .bash_profile.
            Os::Darwin => vec![
                home.join(".bash_profile"),
                home.join(".bashrc"),
                home.join(".profile"),
            ],
            Os::Linux | Os::Windows => vec![
                home.join(".bashrc"),
                home.join(".bash_profile"),
                home.join(".profile"),
            ],
        },
        ShellKind::Fish => vec![home.join(".config").join("fish").join("config.fish")],
        ShellKind::Posix => vec![home.join(".profile")],
        ShellKind::PowerShell => vec![
            home.join("Documents")
                .join("PowerShell")
                .join("Microsoft.PowerShell_profile.ps1"),
            home.join("Documents")
                .join("WindowsPowerShell")
                .join("Microsoft.PowerShell_profile.ps1"),
        ],
    }
}

/// The statements that prepend `dir` to the search path.
pub fn export_lines(kind: ShellKind, dir: &Path) -> Vec<String> {
    let dir = dir.display();
    match kind {
        ShellKind::Bash | ShellKind::Zsh | ShellKind::Posix => {
            vec![format!("export PATH=\"{dir}:$PATH\"")]
        }
        ShellKind::Fish => vec![format!("set -gx PATH \"{dir}\" $PATH")],
        ShellKind::PowerShell => vec![format!("$env:Path = \"{dir};\" + $env:Path")],
    }
}

/// The command that loads `file` into the already running shell.
pub fn apply_command(kind: ShellKind, file: &Path) -> String {
    match kind {
        ShellKind::Bash | ShellKind::Zsh | ShellKind::Fish => format!("source \"{}\"", file.display()),
        ShellKind::Posix | ShellKind::PowerShell => format!(". \"{}\"", file.display()),
    }
}

/// Detects the shell and checks every candidate file for the marker.
pub fn probe_profile(env: &ShellEnvironment) -> EnvironmentProfile {
    let shell_kind = env.shell_kind();
    let candidate_config_files = candidate_files(shell_kind, env);
    let configured = candidate_config_files.iter().any(|file| has_marker(file));

    log_debug!(
        "[Shell Config] Shell '{}', candidates {:?}, configured={}",
        shell_kind.to_string().cyan(),
        candidate_config_files,
        configured
    );

    EnvironmentProfile {
        shell_kind,
        candidate_config_files,
        configured,
    }
}

/// Makes `install_dir` reachable from the user's shell.
///
/// # Arguments
/// * `env`: the captured shell environment.
/// * `install_dir`: the directory holding the installed executable.
/// * `modify`: when `false` (`--no-modify-path`) no file is written and the
///   manual instructions are returned instead.
pub fn configure(env: &ShellEnvironment, install_dir: &Path, modify: bool) -> PathOutcome {
    let profile = probe_profile(env);

    if profile.configured {
        let file = profile
            .candidate_config_files
            .iter()
            .find(|file| has_marker(file))
            .cloned()
            .unwrap_or_default();
        log_info!(
            "[Shell Config] Already configured in {}; nothing to change.",
            file.display().to_string().cyan()
        );
        return PathOutcome::AlreadyConfigured { file };
    }

    if env.path_contains(install_dir) {
        log_info!(
            "[Shell Config] {} is already on your PATH.",
            install_dir.display().to_string().cyan()
        );
        return PathOutcome::AlreadyOnPath;
    }

    let lines = block_lines(profile.shell_kind, install_dir);

    if !modify {
        log_info!("[Shell Config] Leaving shell configuration untouched (--no-modify-path).");
        return PathOutcome::Manual { lines, warning: None };
    }

    for file in &profile.candidate_config_files {
        if !is_writable_candidate(file) {
            log_debug!("[Shell Config] {} is not writable, trying the next candidate.", file.display());
            continue;
        }
        match append_block(file, &lines) {
            Ok(()) => {
                let apply = apply_command(profile.shell_kind, file);
                log_info!(
                    "[Shell Config] Added {} to PATH in {}",
                    install_dir.display().to_string().green(),
                    file.display().to_string().cyan()
                );
                return PathOutcome::Configured {
                    file: file.clone(),
                    apply_command: apply,
                };
            }
            Err(e) => log_warn!(
                "[Shell Config] Failed to write {}: {}",
                file.display().to_string().red(),
                e
            ),
        }
    }

    let warning = InstallWarning::PathConfig {
        reason: format!(
            "no writable {} configuration file among {}",
            profile.shell_kind,
            profile
                .candidate_config_files
                .iter()
                .map(|f| f.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };
    PathOutcome::Manual {
        lines,
        warning: Some(warning),
    }
}

/// MARKER, a dated comment, the exports and END_MARKER.
fn block_lines(kind: ShellKind, install_dir: &Path) -> Vec<String> {
    let mut lines = vec![
        MARKER.to_string(),
        format!(
            "# Added by chrysalis-installer on {}",
            chrono::Local::now().format("%Y-%m-%d")
        ),
    ];
    lines.extend(export_lines(kind, install_dir));
    lines.push(END_MARKER.to_string());
    lines
}

/// Scans raw bytes: rc files are not required to be valid UTF-8.
fn has_marker(file: &Path) -> bool {
    fs::read(file)
        .map(|content| {
            content
                .split(|byte| *byte == b'\n')
                .any(|line| line.trim_ascii() == MARKER.as_bytes())
        })
        .unwrap_or(false)
}

/// An existing file we can append to, or an absent file whose nearest
/// existing ancestor directory is writable. Nothing is created here.
fn is_writable_candidate(file: &Path) -> bool {
    if file.exists() {
        return OpenOptions::new().append(true).open(file).is_ok();
    }
    file.ancestors()
        .skip(1)
        .find(|dir| dir.exists())
        .is_some_and(file_operations::is_writable_dir)
}

fn append_block(file: &Path, lines: &[String]) -> std::io::Result<()> {
    if let Some(parent) = file.parent() {
        file_operations::ensure_dir(parent)?;
    }
    let mut handle = OpenOptions::new().create(true).append(true).open(file)?;
    writeln!(handle)?;
    for line in lines {
        writeln!(handle, "{line}")?;
    }
    handle.flush()
}
