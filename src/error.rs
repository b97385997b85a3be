// src/error.rs

//! Error types for SDK provisioning

use thiserror::Error;

/// Errors raised while provisioning the Cloud SDK
#[derive(Debug, Error)]
pub enum Error {
    /// Required external tools are missing and cannot be installed
    #[error("Missing required tools: {}", .0.join(", "))]
    MissingPrerequisites(Vec<String>),

    /// The SDK archive could not be fetched
    #[error("Download failed: {0}")]
    DownloadError(String),

    /// The SDK archive could not be unpacked
    #[error("Extraction failed: {0}")]
    ExtractError(String),

    /// The vendor installer script failed
    #[error("SDK installer failed: {0}")]
    InstallerError(String),

    /// No usable `gcloud` binary after the install step
    #[error("Cloud SDK binary not found: {0}")]
    VendorNotFound(String),

    /// Listing installed components failed
    #[error("Failed to list installed components: {0}")]
    QueryError(String),

    /// The batched component install call failed
    #[error("Component install failed: {0}")]
    ComponentInstallError(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Target user could not be resolved
    #[error("User resolution failed: {0}")]
    UserError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl Error {
    /// Whether provisioning can continue after this error
    ///
    /// Only a failed component query is recoverable: the installer falls back
    /// to installing everything that was requested.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::QueryError(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

/// Result type for provisioning operations
pub type Result<T> = std::result::Result<T, Error>;
