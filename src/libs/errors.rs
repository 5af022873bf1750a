// Fatal and recoverable conditions the installer can run into.
// Fatal errors abort the pipeline; warnings are reported and collected for the
// final summary while the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal installer errors. Each variant is one failure category.
#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("unsupported platform '{os}/{arch}'")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("could not resolve the release version from {url}: {reason}")]
    VersionResolution { url: String, reason: String },

    #[error("download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("could not unpack {}: {reason}", archive.display())]
    Extraction { archive: PathBuf, reason: String },

    #[error("could not install into {}: {reason}", path.display())]
    Install { path: PathBuf, reason: String },

    #[error("interrupted by signal {0}")]
    Interrupted(i32),
}

impl InstallerError {
    /// The category name printed in the fatal error message.
    pub fn category(&self) -> &'static str {
        match self {
            InstallerError::UnsupportedPlatform { .. } => "UnsupportedPlatform",
            InstallerError::VersionResolution { .. } => "VersionResolutionError",
            InstallerError::Download { .. } => "DownloadError",
            InstallerError::Extraction { .. } => "ExtractionError",
            InstallerError::Install { .. } => "InstallError",
            InstallerError::Interrupted(_) => "Interrupted",
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            InstallerError::Interrupted(_) => 130,
            _ => 1,
        }
    }
}

/// Recoverable conditions: the binary may already be usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallWarning {
    #[error("{}: {reason}", path.display())]
    Permission { path: PathBuf, reason: String },

    #[error("{reason}")]
    PathConfig { reason: String },
}

impl InstallWarning {
    pub fn category(&self) -> &'static str {
        match self {
            InstallWarning::Permission { .. } => "PermissionWarning",
            InstallWarning::PathConfig { .. } => "PathConfigWarning",
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallerError>;
