// src/commands/install.rs
//! Full provisioning step

use anyhow::{Context, Result};
use cloudsdk_provision::{FeatureOptions, InstallOutcome, SdkStatus};
use std::path::Path;

use super::build_provisioner;

/// Install the SDK if it is missing, then any missing components
pub fn cmd_install(config: Option<&Path>, flags: FeatureOptions) -> Result<()> {
    let provisioner = build_provisioner(config, flags)?;
    let report = provisioner
        .run()
        .context("Cloud SDK provisioning failed")?;

    match &report.sdk {
        SdkStatus::AlreadyPresent(gcloud) => {
            println!("Cloud SDK already present: {}", gcloud.display());
        }
        SdkStatus::Installed(gcloud) => {
            println!("Cloud SDK installed: {}", gcloud.display());
        }
    }

    print_outcome(&report.components);
    Ok(())
}

pub(super) fn print_outcome(outcome: &InstallOutcome) {
    match outcome {
        InstallOutcome::NothingRequested => {}
        InstallOutcome::AlreadyInstalled => {
            println!("Requested components already installed");
        }
        InstallOutcome::Installed(ids) => {
            println!("Installed components: {}", ids.join(", "));
        }
    }
}
