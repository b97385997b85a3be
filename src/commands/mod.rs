// src/commands/mod.rs
//! Command handlers for the cloudsdk-provision CLI

mod components;
mod install;
mod status;

pub use components::{cmd_components_install, cmd_components_list};
pub use install::cmd_install;
pub use status::cmd_status;

use anyhow::{Context, Result};
use cloudsdk_provision::{FeatureOptions, InstallMode, Provisioner};
use std::path::Path;
use tracing::debug;

/// Merge flag, environment, and file options, highest priority first
pub fn resolve_options(config: Option<&Path>, flags: FeatureOptions) -> Result<FeatureOptions> {
    let file = FeatureOptions::load_file_layer(config).context("Failed to load options file")?;
    let options = FeatureOptions::layered([flags, FeatureOptions::from_env(), file]);
    debug!("Resolved options: {:?}", options);
    Ok(options)
}

/// Resolve options and the install mode, once per run
pub fn build_provisioner(config: Option<&Path>, flags: FeatureOptions) -> Result<Provisioner> {
    let options = resolve_options(config, flags)?;
    let hint = options.target_user_hint();
    let mode = InstallMode::detect(hint.as_deref())
        .context("Failed to determine install mode")?;
    Ok(Provisioner::new(mode, options))
}
