// src/sdk/mod.rs

//! Cloud SDK presence
//!
//! Ensures a `google-cloud-sdk` tree exists under the install directory:
//!
//! 1. If `gcloud` already resolves, nothing is done.
//! 2. Otherwise the archive is fetched (or taken from disk), unpacked into
//!    the install directory, and the vendor `install.sh` is run.
//! 3. Privileged runs write a system-wide PATH snippet and hand the tree to
//!    the target user.
//! 4. A completion marker is written last. A tree without it (for example
//!    one left behind by a failed `install.sh`) is installed again.
//!
//! After [`SdkInstaller::ensure`] the `gcloud` binary must resolve, otherwise
//! provisioning stops before any component work.

mod download;
mod extract;
mod install;

pub use download::{download_file, ArchiveSource};
pub use extract::extract_tarball;
pub use install::{
    chown_tree, mark_complete, profile_snippet, run_vendor_installer, write_profile_snippet,
};

use crate::error::{Error, Result};
use crate::mode::InstallMode;
use crate::prereq::{Prerequisites, Tool, REQUIRED_TOOLS};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Top-level directory inside the vendor archive
pub const SDK_DIR_NAME: &str = "google-cloud-sdk";

/// File name of the system-wide PATH snippet
pub const PROFILE_SNIPPET_NAME: &str = "google-cloud-sdk.sh";

/// Vendor CLI binary name
pub const GCLOUD_BIN: &str = "gcloud";

/// Written into the SDK root once every install step has succeeded
pub const COMPLETE_MARKER: &str = ".cloudsdk-provision-complete";

/// Paths inside a managed SDK tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLayout {
    root: PathBuf,
}

impl SdkLayout {
    /// Layout for the tree under `install_dir`
    pub fn new(install_dir: impl AsRef<Path>) -> Self {
        Self {
            root: install_dir.as_ref().join(SDK_DIR_NAME),
        }
    }

    /// Directory the archive unpacks into
    pub fn install_dir(&self) -> &Path {
        self.root.parent().unwrap_or(self.root.as_path())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn gcloud(&self) -> PathBuf {
        self.bin_dir().join(GCLOUD_BIN)
    }

    pub fn install_script(&self) -> PathBuf {
        self.root.join("install.sh")
    }

    pub fn marker(&self) -> PathBuf {
        self.root.join(COMPLETE_MARKER)
    }

    /// Whether the managed tree holds a `gcloud` binary from a finished install
    pub fn is_installed(&self) -> bool {
        self.gcloud().is_file() && self.marker().is_file()
    }

    /// Locate the vendor binary
    ///
    /// The managed tree wins over `PATH`; `PATH` is only consulted when
    /// `search_path` is set.
    pub fn find_gcloud(&self, search_path: bool) -> Option<PathBuf> {
        if self.is_installed() {
            return Some(self.gcloud());
        }
        if search_path {
            return which::which(GCLOUD_BIN).ok();
        }
        None
    }

    /// Like [`find_gcloud`](Self::find_gcloud), but missing is an error
    pub fn resolve_gcloud(&self, search_path: bool) -> Result<PathBuf> {
        self.find_gcloud(search_path).ok_or_else(|| {
            Error::VendorNotFound(format!(
                "{} is missing and `{}` is not on PATH",
                self.gcloud().display(),
                GCLOUD_BIN
            ))
        })
    }
}

/// What [`SdkInstaller::ensure`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkStatus {
    /// A usable `gcloud` was already present
    AlreadyPresent(PathBuf),
    /// The SDK was installed by this run
    Installed(PathBuf),
}

impl SdkStatus {
    pub fn gcloud(&self) -> &Path {
        match self {
            Self::AlreadyPresent(path) | Self::Installed(path) => path,
        }
    }
}

/// Installs the SDK tree when it is missing
pub struct SdkInstaller<'a> {
    layout: SdkLayout,
    mode: &'a InstallMode,
    source: ArchiveSource,
    profile_dir: PathBuf,
    search_path: bool,
    required_tools: &'a [Tool],
}

impl<'a> SdkInstaller<'a> {
    pub fn new(layout: SdkLayout, mode: &'a InstallMode, source: ArchiveSource) -> Self {
        Self {
            layout,
            mode,
            source,
            profile_dir: PathBuf::from(crate::config::DEFAULT_PROFILE_DIR),
            search_path: true,
            required_tools: REQUIRED_TOOLS,
        }
    }

    /// Tools that must be present before the vendor installer runs
    pub fn with_required_tools(mut self, tools: &'a [Tool]) -> Self {
        self.required_tools = tools;
        self
    }

    /// Directory for the system-wide PATH snippet
    pub fn with_profile_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profile_dir = dir.into();
        self
    }

    /// Whether a `gcloud` found on `PATH` counts as installed
    pub fn with_path_search(mut self, enabled: bool) -> Self {
        self.search_path = enabled;
        self
    }

    pub fn layout(&self) -> &SdkLayout {
        &self.layout
    }

    /// Make sure the SDK is present
    pub fn ensure(&self) -> Result<SdkStatus> {
        if let Some(gcloud) = self.layout.find_gcloud(self.search_path) {
            info!("Cloud SDK already present at {}", gcloud.display());
            return Ok(SdkStatus::AlreadyPresent(gcloud));
        }

        self.install()?;

        let gcloud = self.layout.resolve_gcloud(false)?;
        Ok(SdkStatus::Installed(gcloud))
    }

    fn install(&self) -> Result<()> {
        Prerequisites::ensure(self.required_tools, self.mode)?;
        info!("Installing Cloud SDK from {}", self.source);

        let staging = tempfile::Builder::new()
            .prefix("cloudsdk-provision")
            .tempdir()
            .map_err(|e| Error::IoError(format!("Failed to create staging directory: {e}")))?;

        let archive = self.source.fetch(staging.path())?;
        let install_dir = self.layout.install_dir();
        let entries = extract_tarball(&archive, install_dir)?;
        debug!("Extracted {} entries into {}", entries, install_dir.display());

        if !self.layout.root().is_dir() {
            return Err(Error::ExtractError(format!(
                "archive did not contain a {SDK_DIR_NAME}/ directory"
            )));
        }

        run_vendor_installer(&self.layout, !self.mode.is_privileged())?;

        let owner = match self.mode {
            InstallMode::Privileged(target) => {
                write_profile_snippet(&self.layout, &self.profile_dir)?;
                if target.uid != 0 {
                    chown_tree(self.layout.root(), target)?;
                    Some(target)
                } else {
                    None
                }
            }
            InstallMode::User(_) => None,
        };

        mark_complete(&self.layout, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = SdkLayout::new("/home/vscode");
        assert_eq!(layout.root(), Path::new("/home/vscode/google-cloud-sdk"));
        assert_eq!(layout.install_dir(), Path::new("/home/vscode"));
        assert_eq!(
            layout.gcloud(),
            PathBuf::from("/home/vscode/google-cloud-sdk/bin/gcloud")
        );
        assert_eq!(
            layout.install_script(),
            PathBuf::from("/home/vscode/google-cloud-sdk/install.sh")
        );
    }

    #[test]
    fn test_resolve_without_sdk() {
        let temp = tempfile::tempdir().unwrap();
        let layout = SdkLayout::new(temp.path());
        assert!(!layout.is_installed());
        let err = layout.resolve_gcloud(false).unwrap_err();
        assert!(matches!(err, Error::VendorNotFound(_)));
    }

    #[test]
    fn test_managed_tree_detected() {
        let temp = tempfile::tempdir().unwrap();
        let layout = SdkLayout::new(temp.path());
        std::fs::create_dir_all(layout.bin_dir()).unwrap();
        std::fs::write(layout.gcloud(), b"#!/bin/sh\n").unwrap();

        // Binary alone is an unfinished install
        assert!(!layout.is_installed());
        assert!(layout.resolve_gcloud(false).is_err());

        std::fs::write(layout.marker(), b"").unwrap();
        assert!(layout.is_installed());
        assert_eq!(layout.resolve_gcloud(false).unwrap(), layout.gcloud());
    }

    #[test]
    fn test_ensure_skips_when_present() {
        let temp = tempfile::tempdir().unwrap();
        let layout = SdkLayout::new(temp.path());
        std::fs::create_dir_all(layout.bin_dir()).unwrap();
        std::fs::write(layout.gcloud(), b"#!/bin/sh\n").unwrap();
        std::fs::write(layout.marker(), b"").unwrap();

        let mode = InstallMode::User(crate::mode::TargetUser::current().unwrap());
        // The source is never touched when the SDK is present
        let source = ArchiveSource::Local(temp.path().join("missing.tar.gz"));
        let installer = SdkInstaller::new(layout.clone(), &mode, source).with_path_search(false);

        assert_eq!(
            installer.ensure().unwrap(),
            SdkStatus::AlreadyPresent(layout.gcloud())
        );
    }
}
