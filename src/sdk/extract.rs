// src/sdk/extract.rs

//! Gzip tarball extraction

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::Path;
use tar::Archive;
use tracing::debug;

/// Unpack a `.tar.gz` archive into `dest`
///
/// Entries whose path would land outside `dest` (absolute paths or `..`
/// components) are rejected instead of being silently skipped. Returns the
/// number of entries unpacked.
pub fn extract_tarball(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive_path).map_err(|e| {
        Error::ExtractError(format!("Failed to open {}: {e}", archive_path.display()))
    })?;

    std::fs::create_dir_all(dest).map_err(|e| {
        Error::IoError(format!("Failed to create directory {}: {e}", dest.display()))
    })?;

    let mut archive = Archive::new(GzDecoder::new(file));
    archive.set_preserve_permissions(true);
    archive.set_overwrite(true);

    let entries = archive
        .entries()
        .map_err(|e| Error::ExtractError(format!("Failed to read archive: {e}")))?;

    let mut count = 0;
    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::ExtractError(format!("Corrupt archive entry: {e}")))?;
        let entry_path = entry
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "<invalid path>".to_string());

        let unpacked = entry
            .unpack_in(dest)
            .map_err(|e| Error::ExtractError(format!("Failed to unpack {entry_path}: {e}")))?;
        if !unpacked {
            return Err(Error::ExtractError(format!(
                "Archive entry escapes the destination: {entry_path}"
            )));
        }
        count += 1;
    }

    debug!("Unpacked {} entries into {}", count, dest.display());
    Ok(count)
}
