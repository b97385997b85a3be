// src/sdk/download.rs

//! SDK archive retrieval
//!
//! The archive is streamed to a temporary file next to the destination and
//! renamed into place once complete, so an interrupted download never leaves
//! a truncated archive under the final name. There is no retry and no
//! timeout: a stalled transfer blocks the provisioning step.

use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Buffer size for streaming downloads (64 KB)
const STREAM_BUFFER_SIZE: usize = 64 * 1024;

/// Where the archive comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSource {
    /// Fetch over HTTP(S)
    Url(String),
    /// Use an archive already on disk
    Local(PathBuf),
}

impl ArchiveSource {
    /// Prefer a local archive when one is configured
    pub fn select(url: &str, local: Option<&Path>) -> Self {
        match local {
            Some(path) => Self::Local(path.to_path_buf()),
            None => Self::Url(url.to_string()),
        }
    }

    /// Make the archive available at a readable path
    ///
    /// Local archives are used in place; remote ones are downloaded into
    /// `staging_dir`.
    pub fn fetch(&self, staging_dir: &Path) -> Result<PathBuf> {
        match self {
            Self::Local(path) => {
                if !path.is_file() {
                    return Err(Error::DownloadError(format!(
                        "SDK archive not found: {}",
                        path.display()
                    )));
                }
                info!("Using local SDK archive {}", path.display());
                Ok(path.clone())
            }
            Self::Url(url) => {
                let dest = staging_dir.join(archive_file_name(url));
                download_file(url, &dest)?;
                Ok(dest)
            }
        }
    }
}

impl std::fmt::Display for ArchiveSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// File name for a downloaded archive, taken from the URL path
fn archive_file_name(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("google-cloud-sdk.tar.gz")
        .to_string()
}

/// Download `url` to `dest_path`
pub fn download_file(url: &str, dest_path: &Path) -> Result<u64> {
    info!("Downloading {} to {}", url, dest_path.display());

    let client = Client::builder()
        .timeout(None::<Duration>)
        .build()
        .map_err(|e| Error::DownloadError(format!("Failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| Error::DownloadError(format!("Failed to fetch {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::DownloadError(format!(
            "HTTP {} from {}",
            response.status(),
            url
        )));
    }

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::IoError(format!("Failed to create directory {}: {e}", parent.display()))
        })?;
    }

    let temp_path = dest_path.with_extension("part");
    let mut file = File::create(&temp_path).map_err(|e| {
        Error::IoError(format!("Failed to create file {}: {e}", temp_path.display()))
    })?;

    let total_size = response.content_length().unwrap_or(0);
    let progress = progress_bar(total_size);

    let written = match stream_to_file(response, &mut file, progress.as_ref()) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
    };

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    fs::rename(&temp_path, dest_path).map_err(|e| {
        Error::IoError(format!(
            "Failed to move {} to {}: {e}",
            temp_path.display(),
            dest_path.display()
        ))
    })?;

    debug!("Downloaded {} bytes", written);
    Ok(written)
}

fn progress_bar(total_size: u64) -> Option<ProgressBar> {
    if total_size == 0 || !std::io::stderr().is_terminal() {
        return None;
    }

    let pb = ProgressBar::new(total_size);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message("google-cloud-sdk");
    Some(pb)
}

fn stream_to_file(
    mut reader: impl Read,
    file: &mut File,
    progress: Option<&ProgressBar>,
) -> Result<u64> {
    let mut downloaded: u64 = 0;
    let mut buffer = vec![0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;

        downloaded += bytes_read as u64;
        if let Some(pb) = progress {
            pb.set_position(downloaded);
        }
    }

    file.flush()
        .map_err(|e| Error::IoError(format!("Failed to flush data: {e}")))?;
    Ok(downloaded)
}
