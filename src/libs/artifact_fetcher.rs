// ArtifactFetcher: downloads the release archive for the detected platform
// and unpacks it into a process-scoped staging directory.
//
// The staging directory is a `TempDir`. It is removed when the returned
// `FetchedArtifact` is dropped, and on every early return before that, so no
// partial download or extracted tree survives a failed or interrupted run.

use crate::libs::errors::{InstallerError, Result};
use crate::libs::interrupt::Interrupt;
use crate::libs::utilities::{binary, compression, network};
use crate::schemas::release::ReleaseAsset;
use crate::{log_debug, log_info};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CHUNK_SIZE: usize = 64 * 1024;

/// A self-cleaning temporary directory holding the archive and its contents.
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Creates a fresh staging directory under `root`.
    pub fn create_in(root: &Path) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("chrysalis-install-")
            .tempdir_in(root)?;
        log_debug!("[Fetch] Staging directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// The unpacked artifact. Keep it alive until the executable has been moved out.
pub struct FetchedArtifact {
    pub staging: StagingArea,
    pub executable: PathBuf,
}

/// Downloads and unpacks `asset` inside a new staging directory under `staging_root`.
///
/// `interrupt` is polled between download chunks and before unpacking.
pub fn fetch_artifact(
    asset: &ReleaseAsset,
    staging_root: &Path,
    interrupt: Interrupt,
) -> Result<FetchedArtifact> {
    let staging = StagingArea::create_in(staging_root).map_err(|e| InstallerError::Download {
        url: asset.download_url.clone(),
        reason: format!(
            "could not create a staging directory in {}: {}",
            staging_root.display(),
            e
        ),
    })?;

    let archive = download(asset, &staging, interrupt)?;
    interrupt.check()?;
    let executable = unpack(asset, &archive, &staging)?;

    Ok(FetchedArtifact { staging, executable })
}

/// Streams the asset into the staging directory with a progress bar.
///
/// # Returns
/// * The path of the downloaded archive.
/// * `InstallerError::Download` carrying the exact URL on any transport
///   failure, non-success status, or truncated body.
/// * `InstallerError::Interrupted` when a signal arrives while streaming, or
///   when the request fails after one was recorded.
pub fn download(asset: &ReleaseAsset, staging: &StagingArea, interrupt: Interrupt) -> Result<PathBuf> {
    let url = &asset.download_url;
    log_info!("[Fetch] Downloading {}", url.blue());

    let failure = |reason: String| {
        interrupt.or_interrupted(InstallerError::Download {
            url: url.clone(),
            reason,
        })
    };

    let response = network::agent()
        .get(url)
        .call()
        .map_err(|e| failure(network::describe_error(e)))?;

    let total = response
        .header("Content-Length")
        .and_then(|value| value.parse::<u64>().ok());
    let progress = progress_bar(total);

    let archive_path = staging.path().join(&asset.name);
    let mut file = File::create(&archive_path)
        .map_err(|e| failure(format!("could not create {}: {}", archive_path.display(), e)))?;

    let mut reader = response.into_reader();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut received: u64 = 0;
    loop {
        interrupt.check()?;
        let read = reader
            .read(&mut buffer)
            .map_err(|e| failure(format!("connection error after {received} bytes: {e}")))?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])
            .map_err(|e| failure(format!("could not write {}: {}", archive_path.display(), e)))?;
        received += read as u64;
        progress.inc(read as u64);
    }
    progress.finish_and_clear();

    if let Some(expected) = total {
        if received != expected {
            return Err(failure(format!(
                "body truncated: received {received} of {expected} bytes"
            )));
        }
    }

    log_debug!(
        "[Fetch] Downloaded {} bytes to {}",
        received,
        archive_path.display().to_string().green()
    );
    Ok(archive_path)
}

/// Unpacks the archive and locates the executable inside it.
pub fn unpack(asset: &ReleaseAsset, archive: &Path, staging: &StagingArea) -> Result<PathBuf> {
    log_info!("[Fetch] Unpacking {}", asset.name.bold());

    let failure = |reason: String| InstallerError::Extraction {
        archive: archive.to_path_buf(),
        reason,
    };

    let extracted = compression::extract_archive(archive, staging.path(), asset.archive_kind)
        .map_err(|e| failure(e.to_string()))?;

    binary::find_executable(&extracted, &asset.executable_name).ok_or_else(|| {
        failure(format!(
            "archive does not contain '{}'",
            asset.executable_name
        ))
    })
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) => {
            let style = ProgressStyle::with_template(
                "  {bytes:>10}/{total_bytes:<10} [{bar:30.cyan/blue}] {bytes_per_sec}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
            ProgressBar::new(len).with_style(style)
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_message("downloading");
            bar
        }
    }
}
