// Installer: picks the install directory and places the staged executable in it.
//
// Directory policy, first usable candidate wins:
//   1. the explicit override (`--install-dir` / CHRYSALIS_INSTALL_DIR), created if absent
//   2. the per-user binary directory, created if absent
//   3. the system-wide binary directory, through `sudo` if direct writes are denied
//
// A failed move is fatal. Failing to set permission bits or to run the version
// probe afterwards only produces a warning: the binary may already be usable.

use crate::libs::errors::{InstallWarning, InstallerError, Result};
use crate::libs::utilities::{binary, file_operations};
use crate::schemas::install_target::{InstallScope, InstallTarget};
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Candidate directories, already resolved for the host.
#[derive(Debug, Clone, Default)]
pub struct InstallPolicy {
    pub override_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
    pub system_dir: Option<PathBuf>,
    /// Escalate to `sudo` without asking.
    pub assume_yes: bool,
}

/// Outcome of a successful placement.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub target: InstallTarget,
    /// `--version` output of the binary that was replaced, if any.
    pub previous: Option<String>,
    /// `--version` output of the freshly installed binary.
    pub probe: Option<String>,
    pub warnings: Vec<InstallWarning>,
}

/// Applies the directory policy.
///
/// # Returns
/// * `Err(InstallerError::Install)` when no candidate can receive the binary.
pub fn choose_target(policy: &InstallPolicy, executable_name: &str) -> Result<InstallTarget> {
    if let Some(dir) = &policy.override_dir {
        match file_operations::ensure_dir(dir) {
            Ok(()) if file_operations::is_writable_dir(dir) => {
                return Ok(InstallTarget::new(dir.clone(), executable_name, InstallScope::Override, false));
            }
            Ok(()) => log_warn!(
                "[Install] Override directory {} is not writable; falling back to the default locations.",
                dir.display().to_string().red()
            ),
            Err(e) => log_warn!(
                "[Install] Could not create override directory {}: {}; falling back to the default locations.",
                dir.display().to_string().red(),
                e
            ),
        }
    }

    if let Some(dir) = &policy.user_dir {
        match file_operations::ensure_dir(dir) {
            Ok(()) if file_operations::is_writable_dir(dir) => {
                return Ok(InstallTarget::new(dir.clone(), executable_name, InstallScope::User, false));
            }
            Ok(()) => log_debug!("[Install] {} is not writable.", dir.display()),
            Err(e) => log_debug!("[Install] Could not create {}: {}", dir.display(), e),
        }
    }

    if let Some(dir) = &policy.system_dir {
        if file_operations::is_writable_dir(dir) {
            return Ok(InstallTarget::new(dir.clone(), executable_name, InstallScope::System, false));
        }
        if cfg!(unix) && confirm_elevation(dir, policy.assume_yes) {
            return Ok(InstallTarget::new(dir.clone(), executable_name, InstallScope::System, true));
        }
    }

    let last = policy
        .system_dir
        .as_ref()
        .or(policy.user_dir.as_ref())
        .or(policy.override_dir.as_ref())
        .cloned()
        .unwrap_or_default();
    Err(InstallerError::Install {
        path: last,
        reason: "no writable install directory found; set CHRYSALIS_INSTALL_DIR to a writable location".to_string(),
    })
}

/// Moves `staged` into `target`, sets permissions and probes the result.
pub fn install(staged: &Path, target: &InstallTarget) -> Result<InstallReport> {
    let destination = &target.executable_path;
    let mut warnings = Vec::new();

    let previous = if destination.exists() {
        let version = binary::probe_version(destination).ok();
        log_info!(
            "[Install] Replacing existing {} ({})",
            destination.display().to_string().yellow(),
            version.as_deref().unwrap_or("unknown version")
        );
        version
    } else {
        None
    };

    let placed = if target.elevated {
        sudo_move(staged, target)
    } else {
        file_operations::move_into_place(staged, destination).map_err(|e| e.to_string())
    };
    placed.map_err(|reason| InstallerError::Install {
        path: destination.clone(),
        reason,
    })?;
    log_info!(
        "[Install] Installed {} ({} directory)",
        destination.display().to_string().green(),
        target.scope
    );

    let permissions = if target.elevated {
        sudo(&["chmod", "755"], destination)
    } else {
        binary::make_executable(destination).map_err(|e| e.to_string())
    };
    if let Err(reason) = permissions {
        warnings.push(InstallWarning::Permission {
            path: destination.clone(),
            reason: format!("could not set executable permissions: {reason}"),
        });
    }

    let probe = match binary::probe_version(destination) {
        Ok(output) => {
            log_info!("[Install] {} --version: {}", destination.display(), output.bold());
            Some(output)
        }
        Err(reason) => {
            warnings.push(InstallWarning::Permission {
                path: destination.clone(),
                reason: format!("verification probe failed: {reason}"),
            });
            None
        }
    };

    Ok(InstallReport {
        target: target.clone(),
        previous,
        probe,
        warnings,
    })
}

/// Asks before writing to `dir` with `sudo`.
/// Without a terminal the answer is "no" unless `--yes` was given.
fn confirm_elevation(dir: &Path, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    if !std::io::stdin().is_terminal() {
        log_warn!(
            "[Install] {} requires elevated privileges; re-run with --yes to allow sudo.",
            dir.display().to_string().yellow()
        );
        return false;
    }

    dialoguer::Confirm::new()
        .with_prompt(format!("Install into {} using sudo?", dir.display()))
        .default(true)
        .interact()
        .unwrap_or(false)
}

fn sudo_move(staged: &Path, target: &InstallTarget) -> std::result::Result<(), String> {
    sudo(&["mkdir", "-p"], &target.directory)?;
    let status = Command::new("sudo")
        .arg("mv")
        .arg("-f")
        .arg(staged)
        .arg(&target.executable_path)
        .status()
        .map_err(|e| format!("could not run sudo: {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("'sudo mv' exited with {status}"))
    }
}

fn sudo(args: &[&str], path: &Path) -> std::result::Result<(), String> {
    log_debug!("[Install] sudo {} {}", args.join(" "), path.display());
    let status = Command::new("sudo")
        .args(args)
        .arg(path)
        .status()
        .map_err(|e| format!("could not run sudo: {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("'sudo {}' exited with {}", args.join(" "), status))
    }
}
