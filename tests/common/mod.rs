// tests/common/mod.rs

//! Shared test utilities: a fake Cloud SDK that records what it is asked to do.
//!
//! The fake `gcloud` keeps its component state in `<sdk>/.components`, logs
//! every list query to `<sdk>/.query-log` and every install call to
//! `<sdk>/.install-log`. Dropping `.fail-list` or `.fail-install` into the
//! SDK root makes the respective call fail.

#![allow(dead_code)]

use cloudsdk_provision::{FeatureOptions, InstallMode, Provisioner, TargetUser};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FAKE_GCLOUD: &str = r#"#!/bin/sh
root="$(cd "$(dirname "$0")/.." && pwd)"
state="$root/.components"
case "$1 $2" in
  "components list")
    echo "list" >> "$root/.query-log"
    if [ -e "$root/.fail-list" ]; then
      echo "ERROR: listing is broken" >&2
      exit 1
    fi
    if [ -f "$state" ]; then
      cat "$state"
    fi
    exit 0
    ;;
  "components install")
    shift 2
    echo "$*" >> "$root/.install-log"
    if [ -e "$root/.fail-install" ]; then
      echo "ERROR: (gcloud.components.install) unknown component" >&2
      exit 1
    fi
    for arg in "$@"; do
      case "$arg" in
        --*) ;;
        *) echo "$arg" >> "$state" ;;
      esac
    done
    exit 0
    ;;
esac
echo "unexpected arguments: $*" >&2
exit 2
"#;

pub const FAKE_INSTALLER: &str = r#"#!/bin/sh
echo "$@" > "$(dirname "$0")/.installer-args"
"#;

pub const FAILING_INSTALLER: &str = r#"#!/bin/sh
echo "installer exploded" >&2
exit 1
"#;

/// What the fake archive contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkVariant {
    /// install.sh plus a working bin/gcloud
    Complete,
    /// install.sh succeeds but there is no bin/gcloud
    MissingBinary,
    /// install.sh fails
    BrokenInstaller,
    /// Files outside a google-cloud-sdk/ directory
    WrongLayout,
}

/// Write a gzip tarball shaped like the vendor archive
pub fn write_sdk_archive(path: &Path, variant: SdkVariant) {
    let mut entries: Vec<(&str, &str, u32)> = match variant {
        SdkVariant::Complete => vec![
            ("google-cloud-sdk/install.sh", FAKE_INSTALLER, 0o755),
            ("google-cloud-sdk/bin/gcloud", FAKE_GCLOUD, 0o755),
        ],
        SdkVariant::MissingBinary => vec![("google-cloud-sdk/install.sh", FAKE_INSTALLER, 0o755)],
        SdkVariant::BrokenInstaller => vec![
            ("google-cloud-sdk/install.sh", FAILING_INSTALLER, 0o755),
            ("google-cloud-sdk/bin/gcloud", FAKE_GCLOUD, 0o755),
        ],
        SdkVariant::WrongLayout => vec![("sdk/install.sh", FAKE_INSTALLER, 0o755)],
    };
    if variant != SdkVariant::WrongLayout {
        entries.push(("google-cloud-sdk/VERSION", "500.0.0\n", 0o644));
    }

    let file = File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, content, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        builder.append_data(&mut header, name, content.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

/// A temp directory holding a fake archive and an empty install directory
pub struct SdkFixture {
    pub temp: TempDir,
    pub archive: PathBuf,
    pub install_dir: PathBuf,
}

impl SdkFixture {
    pub fn new(variant: SdkVariant) -> Self {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("google-cloud-sdk.tar.gz");
        write_sdk_archive(&archive, variant);
        let install_dir = temp.path().join("home");
        std::fs::create_dir_all(&install_dir).unwrap();
        Self {
            temp,
            archive,
            install_dir,
        }
    }

    pub fn sdk_root(&self) -> PathBuf {
        self.install_dir.join("google-cloud-sdk")
    }

    pub fn options(&self, components: &str) -> FeatureOptions {
        FeatureOptions {
            additional_components: Some(components.to_string()),
            install_dir: Some(self.install_dir.clone()),
            sdk_archive: Some(self.archive.clone()),
            profile_dir: Some(self.temp.path().join("profile.d")),
            ..Default::default()
        }
    }

    /// Unprivileged provisioner that ignores any gcloud on PATH
    pub fn provisioner(&self, components: &str) -> Provisioner {
        let mode = InstallMode::User(TargetUser::current().unwrap());
        Provisioner::new(mode, self.options(components))
            .with_path_search(false)
            .with_required_tools(&[])
    }

    /// Privileged provisioner whose target is the current user
    pub fn provisioner_privileged(&self, components: &str) -> Provisioner {
        let mode = InstallMode::Privileged(TargetUser::current().unwrap());
        Provisioner::new(mode, self.options(components))
            .with_path_search(false)
            .with_required_tools(&[])
    }

    pub fn profile_snippet(&self) -> PathBuf {
        self.temp.path().join("profile.d/google-cloud-sdk.sh")
    }

    /// Lines of a log file in the SDK root, empty when absent
    pub fn log(&self, name: &str) -> Vec<String> {
        std::fs::read_to_string(self.sdk_root().join(name))
            .map(|s| s.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    pub fn install_calls(&self) -> Vec<String> {
        self.log(".install-log")
    }

    pub fn query_calls(&self) -> usize {
        self.log(".query-log").len()
    }

    /// Mark components as installed in the fake state
    pub fn set_installed(&self, ids: &[&str]) {
        let mut content = ids.join("\n");
        content.push('\n');
        std::fs::write(self.sdk_root().join(".components"), content).unwrap();
    }

    pub fn touch(&self, name: &str) {
        std::fs::write(self.sdk_root().join(name), b"").unwrap();
    }
}

/// Lay out an already installed SDK tree without going through the archive
pub fn write_installed_sdk(install_dir: &Path) -> PathBuf {
    let root = install_dir.join("google-cloud-sdk");
    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let gcloud = bin.join("gcloud");
    std::fs::write(&gcloud, FAKE_GCLOUD).unwrap();
    std::fs::set_permissions(&gcloud, std::fs::Permissions::from_mode(0o755)).unwrap();
    std::fs::write(root.join(cloudsdk_provision::sdk::COMPLETE_MARKER), b"").unwrap();
    root
}
