// Defines the release-side data structures: the opaque release tag, the
// registry's "latest release" response, and the derived downloadable asset.

use crate::schemas::platform::PlatformIdentifier;
use serde::Deserialize;
use std::fmt;

/// An opaque release tag such as `v1.2.3`.
///
/// The installer never parses or re-derives version numbers; the tag is used
/// verbatim when building the download URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The subset of the registry's "latest release" JSON the installer reads.
///
/// `tag_name` is optional here so that a response without it surfaces as a
/// resolution error instead of a generic decode failure.
#[derive(Debug, Deserialize)]
pub struct LatestRelease {
    pub(crate) tag_name: Option<String>,
}

/// Archive formats the release pipeline publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Unix platforms: `<binary>-<os>-<arch>.tar.gz`
    TarGz,
    /// Windows: `<binary>-windows-<arch>.exe.zip`
    Zip,
}

impl ArchiveKind {
    /// The file extension appended to `<binary>-<os>-<arch>`.
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveKind::TarGz => "tar.gz",
            ArchiveKind::Zip => "exe.zip",
        }
    }
}

/// A downloadable artifact, derived deterministically from
/// `(binary_name, platform, version)` and the registry base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: String,
    pub archive_kind: ArchiveKind,
    /// The executable's file name inside the archive (`chrysalis` / `chrysalis.exe`).
    pub executable_name: String,
}

impl ReleaseAsset {
    /// Builds the asset for a platform and version.
    ///
    /// The URL follows
    /// `{registry_base}/releases/download/{version}/{binary}-{os}-{arch}.{ext}`.
    /// A trailing `/` on `registry_base` is ignored.
    pub fn resolve(
        binary_name: &str,
        platform: PlatformIdentifier,
        version: &ReleaseVersion,
        registry_base: &str,
    ) -> Self {
        let archive_kind = if platform.os().is_unix() {
            ArchiveKind::TarGz
        } else {
            ArchiveKind::Zip
        };
        let name = format!(
            "{}-{}-{}.{}",
            binary_name,
            platform.os().as_str(),
            platform.arch().as_str(),
            archive_kind.extension()
        );
        let download_url = format!(
            "{}/releases/download/{}/{}",
            registry_base.trim_end_matches('/'),
            version,
            name
        );
        let executable_name = match archive_kind {
            ArchiveKind::TarGz => binary_name.to_string(),
            ArchiveKind::Zip => format!("{binary_name}.exe"),
        };

        Self {
            name,
            download_url,
            archive_kind,
            executable_name,
        }
    }
}
