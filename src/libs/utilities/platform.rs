// Raw host probing: the strings the platform detector normalizes, and the
// check for an x86-on-ARM translation layer (Rosetta 2) on macOS.

use crate::log_debug;
use colored::Colorize;
use std::process::Command;

/// The raw operating system name of the host (e.g. "linux", "macos", "windows").
///
/// The installer is itself a native build for the host it ships to, so the
/// compile-time target is the host OS.
pub fn raw_os() -> &'static str {
    std::env::consts::OS
}

/// The raw machine architecture of the running process (e.g. "x86_64", "aarch64").
pub fn raw_arch() -> &'static str {
    std::env::consts::ARCH
}

/// Detects whether this process runs under Rosetta 2.
///
/// macOS reports `sysctl.proc_translated = 1` for translated processes. Any
/// other outcome, including a failing `sysctl`, means "not translated".
pub fn is_translated() -> bool {
    if raw_os() != "macos" {
        return false;
    }

    match Command::new("sysctl").args(["-n", "sysctl.proc_translated"]).output() {
        Ok(output) if output.status.success() => {
            let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
            log_debug!("[Platform] sysctl.proc_translated = {}", value.cyan());
            value == "1"
        }
        Ok(output) => {
            log_debug!("[Platform] sysctl.proc_translated unavailable (exit status {})", output.status);
            false
        }
        Err(e) => {
            log_debug!("[Platform] Could not run sysctl: {}", e);
            false
        }
    }
}
