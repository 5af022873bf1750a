// Archive extraction for the two artifact formats the release pipeline
// publishes: `.tar.gz` for Unix platforms and `.zip` for Windows.

use crate::log_debug;
use crate::schemas::release::ArchiveKind;
use colored::Colorize;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::Archive;
use zip::ZipArchive;

/// Extracts `src` into a new `extracted` subdirectory of `dest`.
///
/// # Arguments
/// * `src`: the downloaded archive.
/// * `dest`: the staging directory; `dest/extracted` is created.
/// * `kind`: the archive format, known from the asset name.
///
/// # Returns
/// * `Ok(PathBuf)` with the path of the `extracted` directory.
/// * `Err(io::Error)` if the archive is corrupt or unreadable.
pub fn extract_archive(src: &Path, dest: &Path, kind: ArchiveKind) -> io::Result<PathBuf> {
    log_debug!(
        "[Fetch] Extracting {:?} into {:?}",
        src.to_string_lossy().blue(),
        dest.to_string_lossy().cyan()
    );

    let extracted_path = dest.join("extracted");
    fs::create_dir_all(&extracted_path)?;

    match kind {
        ArchiveKind::TarGz => {
            let decompressor = GzDecoder::new(File::open(src)?);
            let mut archive = Archive::new(decompressor);
            // `unpack` refuses entries that would escape the destination.
            archive.unpack(&extracted_path)?;
            log_debug!("[Fetch] Tar.gz archive extracted successfully.");
        }
        ArchiveKind::Zip => {
            let mut archive = ZipArchive::new(File::open(src)?)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            archive
                .extract(&extracted_path)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            log_debug!("[Fetch] Zip archive extracted successfully.");
        }
    }

    Ok(extracted_path)
}
