// src/lib.rs

//! Cloud SDK provisioning for development containers
//!
//! Makes sure the Google Cloud SDK is installed in a container and installs
//! any additional SDK components that were asked for.
//!
//! # Architecture
//!
//! - Mode first: privileged vs. user install is resolved once at start
//! - Layered options: flags, environment channels, TOML file, defaults
//! - Idempotent: an SDK that is already present is left alone, and only
//!   components missing from the local state are installed
//! - One seam: the `VendorCli` trait is everything the component logic
//!   needs from `gcloud`

pub mod components;
pub mod config;
mod error;
pub mod mode;
pub mod prereq;
pub mod provision;
pub mod sdk;
pub mod vendor;

pub use components::{ComponentInstaller, ComponentRequest, InstallOutcome, InstalledSet, InstalledState};
pub use config::FeatureOptions;
pub use error::{Error, Result};
pub use mode::{InstallMode, TargetUser};
pub use provision::{ProvisionReport, Provisioner};
pub use sdk::{ArchiveSource, SdkInstaller, SdkLayout, SdkStatus};
pub use vendor::{Gcloud, VendorCli};
