// src/commands/components.rs
//! Component commands against an existing SDK

use anyhow::{Context, Result};
use cloudsdk_provision::{ComponentRequest, FeatureOptions, InstalledSet, VendorCli};
use std::path::{Path, PathBuf};

use super::build_provisioner;
use super::install::print_outcome;

fn install_dir_flags(install_dir: Option<PathBuf>) -> FeatureOptions {
    FeatureOptions {
        install_dir,
        ..Default::default()
    }
}

/// Print locally installed component identifiers, one per line
pub fn cmd_components_list(config: Option<&Path>, install_dir: Option<PathBuf>) -> Result<()> {
    let provisioner = build_provisioner(config, install_dir_flags(install_dir))?;
    let gcloud = provisioner.vendor()?;

    let installed: InstalledSet = gcloud
        .list_installed()
        .context("Failed to list installed components")?
        .into_iter()
        .collect();

    for id in installed.sorted() {
        println!("{}", id);
    }
    Ok(())
}

/// Install whatever part of `components` is missing
pub fn cmd_components_install(
    config: Option<&Path>,
    components: &str,
    install_dir: Option<PathBuf>,
) -> Result<()> {
    let provisioner = build_provisioner(config, install_dir_flags(install_dir))?;
    let gcloud = provisioner.vendor()?;

    let request = ComponentRequest::parse(components);
    let outcome = provisioner
        .install_components(&gcloud, &request)
        .context("Component installation failed")?;

    print_outcome(&outcome);
    Ok(())
}
