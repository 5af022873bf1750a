// PlatformDetector: maps raw host OS/architecture strings onto the canonical
// `PlatformIdentifier`. Unsupported combinations are a fatal error, never a
// default.

use crate::libs::errors::{InstallerError, Result};
use crate::libs::utilities::platform;
use crate::schemas::platform::{Arch, Os, PlatformIdentifier};
use crate::{log_debug, log_warn};
use colored::Colorize;

/// Normalizes an OS name. Case-insensitive.
fn normalize_os(raw: &str) -> Option<Os> {
    let os = raw.trim().to_lowercase();
    match os.as_str() {
        "linux" => Some(Os::Linux),
        "darwin" | "macos" => Some(Os::Darwin),
        "windows" | "windows_nt" => Some(Os::Windows),
        // uname on Git Bash / MSYS2 / Cygwin reports e.g. "MINGW64_NT-10.0".
        _ if os.starts_with("mingw") || os.starts_with("msys") || os.starts_with("cygwin") => {
            Some(Os::Windows)
        }
        _ => None,
    }
}

/// Unifies architecture synonyms. Case-insensitive.
fn normalize_arch(raw: &str) -> Option<Arch> {
    match raw.trim().to_lowercase().as_str() {
        "x86_64" | "amd64" | "x64" => Some(Arch::Amd64),
        "aarch64" | "arm64" => Some(Arch::Arm64),
        _ => None,
    }
}

/// Builds the platform identifier from raw host strings.
///
/// # Arguments
/// * `raw_os`: OS name as reported by the host (`"Darwin"`, `"linux"`, ...).
/// * `raw_arch`: machine architecture (`"x86_64"`, `"aarch64"`, ...).
/// * `translated`: whether the process runs under an x86-on-ARM translation
///   layer. A darwin/amd64 result is then upgraded to darwin/arm64 so the
///   native build is installed.
///
/// # Returns
/// * `Err(InstallerError::UnsupportedPlatform)` for any pair outside the
///   supported set.
pub fn detect_from(raw_os: &str, raw_arch: &str, translated: bool) -> Result<PlatformIdentifier> {
    let (Some(os), Some(arch)) = (normalize_os(raw_os), normalize_arch(raw_arch)) else {
        return Err(InstallerError::UnsupportedPlatform {
            os: raw_os.to_string(),
            arch: raw_arch.to_string(),
        });
    };

    if os == Os::Darwin && arch == Arch::Amd64 && translated {
        log_warn!(
            "[Platform] Running under Rosetta 2 on Apple Silicon; installing the native {} build instead of {}.",
            "darwin/arm64".green(),
            "darwin/amd64".yellow()
        );
        return Ok(PlatformIdentifier::new(Os::Darwin, Arch::Arm64));
    }

    Ok(PlatformIdentifier::new(os, arch))
}

/// Raw facts about the host, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    pub os: String,
    pub arch: String,
    /// Running under an x86-on-ARM translation layer.
    pub translated: bool,
}

impl HostPlatform {
    pub fn new(os: &str, arch: &str, translated: bool) -> Self {
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
            translated,
        }
    }

    /// Probes the running host.
    pub fn probe() -> Self {
        let host = Self::new(platform::raw_os(), platform::raw_arch(), platform::is_translated());
        log_debug!(
            "[Platform] Raw host: os={} arch={} translated={}",
            host.os.cyan(),
            host.arch.cyan(),
            host.translated
        );
        host
    }

    /// `true` when detection swaps the darwin/amd64 build for darwin/arm64.
    pub fn substitutes_native_build(&self) -> bool {
        self.translated
            && normalize_os(&self.os) == Some(Os::Darwin)
            && normalize_arch(&self.arch) == Some(Arch::Amd64)
    }
}

/// Normalizes an already captured host.
pub fn detect_host(host: &HostPlatform) -> Result<PlatformIdentifier> {
    detect_from(&host.os, &host.arch, host.translated)
}
