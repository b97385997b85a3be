// src/config.rs

//! Provisioning options and their layering
//!
//! Options reach the provisioner through several channels: command-line
//! flags, environment variables (the dev container option channel plus
//! older spellings), and an optional TOML file. Each channel produces a
//! [`FeatureOptions`] record and [`FeatureOptions::layered`] merges them,
//! highest priority first. Blank values never mask a lower layer.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Archive for 64-bit Linux from the rapid release channel
pub const DEFAULT_DOWNLOAD_URL: &str =
    "https://dl.google.com/dl/cloudsdk/channels/rapid/google-cloud-sdk.tar.gz";

/// System-wide shell profile directory
pub const DEFAULT_PROFILE_DIR: &str = "/etc/profile.d";

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/cloudsdk-provision.toml";

/// Environment channels for the component list, highest priority first
pub const COMPONENT_ENV_VARS: &[&str] = &[
    "ADDITIONALCOMPONENTS",
    "ADDITIONAL_COMPONENTS",
    "GCLOUD_COMPONENTS",
];

/// Environment channels for the target user hint, highest priority first
pub const TARGET_USER_ENV_VARS: &[&str] = &["_REMOTE_USER", "USERNAME"];

/// One layer of provisioning options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureOptions {
    /// Raw comma-separated component list
    #[serde(alias = "additionalComponents")]
    pub additional_components: Option<String>,

    /// Directory that receives the `google-cloud-sdk` tree
    pub install_dir: Option<PathBuf>,

    /// Archive URL
    pub download_url: Option<String>,

    /// Local archive used instead of downloading
    pub sdk_archive: Option<PathBuf>,

    /// Account the SDK is provisioned for when running privileged
    pub target_user: Option<String>,

    /// System-wide profile directory for the PATH snippet
    pub profile_dir: Option<PathBuf>,
}

impl FeatureOptions {
    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid options file: {e}")))
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        debug!("Loaded options from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Load the explicit config file, or the default one if it exists
    pub fn load_file_layer(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Build the environment layer from a variable lookup
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_of =
            |names: &[&str]| names.iter().copied().find_map(|name| non_blank(lookup(name)));

        Self {
            additional_components: first_of(COMPONENT_ENV_VARS),
            install_dir: first_of(&["SDK_INSTALL_DIR"]).map(PathBuf::from),
            download_url: first_of(&["SDK_DOWNLOAD_URL"]),
            sdk_archive: first_of(&["SDK_ARCHIVE"]).map(PathBuf::from),
            target_user: None,
            profile_dir: None,
        }
    }

    /// Build the environment layer from the process environment
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Fill unset or blank fields of `self` from `lower`
    pub fn merge(self, lower: FeatureOptions) -> FeatureOptions {
        FeatureOptions {
            additional_components: non_blank(self.additional_components)
                .or_else(|| non_blank(lower.additional_components)),
            install_dir: non_empty_path(self.install_dir)
                .or_else(|| non_empty_path(lower.install_dir)),
            download_url: non_blank(self.download_url).or_else(|| non_blank(lower.download_url)),
            sdk_archive: non_empty_path(self.sdk_archive)
                .or_else(|| non_empty_path(lower.sdk_archive)),
            target_user: non_blank(self.target_user).or_else(|| non_blank(lower.target_user)),
            profile_dir: non_empty_path(self.profile_dir)
                .or_else(|| non_empty_path(lower.profile_dir)),
        }
    }

    /// Merge layers given highest priority first
    pub fn layered(layers: impl IntoIterator<Item = FeatureOptions>) -> FeatureOptions {
        layers
            .into_iter()
            .fold(FeatureOptions::default(), |merged, layer| merged.merge(layer))
    }

    /// Target user hint: the merged option, then the environment hints
    pub fn target_user_hint_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        non_blank(self.target_user.clone()).or_else(|| {
            TARGET_USER_ENV_VARS
                .iter()
                .copied()
                .find_map(|name| non_blank(lookup(name)))
        })
    }

    pub fn target_user_hint(&self) -> Option<String> {
        self.target_user_hint_with(|name| std::env::var(name).ok())
    }

    /// Raw component list, empty when unset
    pub fn components_raw(&self) -> &str {
        self.additional_components.as_deref().unwrap_or("")
    }

    pub fn download_url(&self) -> &str {
        self.download_url.as_deref().unwrap_or(DEFAULT_DOWNLOAD_URL)
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.profile_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_DIR))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|p| !p.as_os_str().is_empty())
}
