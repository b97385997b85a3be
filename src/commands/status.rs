// src/commands/status.rs
//! Show what a provisioning run would act on

use anyhow::Result;
use cloudsdk_provision::FeatureOptions;
use std::path::Path;

use super::build_provisioner;

pub fn cmd_status(config: Option<&Path>, flags: FeatureOptions) -> Result<()> {
    let provisioner = build_provisioner(config, flags)?;
    let layout = provisioner.layout();
    let options = provisioner.options();

    println!("Mode:        {}", provisioner.mode());
    println!("Target user: {}", provisioner.mode().target());
    println!("SDK root:    {}", layout.root().display());
    match provisioner.vendor() {
        Ok(gcloud) => println!("gcloud:      {}", gcloud.binary().display()),
        Err(_) => println!("gcloud:      not installed"),
    }
    match &options.sdk_archive {
        Some(path) => println!("Source:      {}", path.display()),
        None => println!("Source:      {}", options.download_url()),
    }
    if provisioner.mode().is_privileged() {
        println!("Profile dir: {}", options.profile_dir().display());
    }

    let raw = options.components_raw();
    if raw.is_empty() {
        println!("Components:  (none requested)");
    } else {
        println!("Components:  {}", cloudsdk_provision::ComponentRequest::parse(raw));
    }
    Ok(())
}
