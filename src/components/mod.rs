// src/components/mod.rs

//! SDK components: requests, local state, and idempotent installation
//!
//! A component is an independently installable unit of the Cloud SDK
//! (`beta`, `kubectl`, `cloud-run-proxy`, ...). Installation works on a flat
//! list with no dependency resolution:
//!
//! | Step | Outcome |
//! |------|---------|
//! | request parses to nothing | [`InstallOutcome::NothingRequested`], vendor CLI untouched |
//! | query local state | failure degrades to [`InstalledState::Unknown`] |
//! | `requested - installed` is empty | [`InstallOutcome::AlreadyInstalled`] |
//! | otherwise | one batched install, [`InstallOutcome::Installed`] |
//!
//! # Usage
//!
//! ```ignore
//! use cloudsdk_provision::components::{ComponentInstaller, ComponentRequest};
//! use cloudsdk_provision::vendor::Gcloud;
//!
//! let request = ComponentRequest::parse("cloud-run-proxy, beta");
//! let outcome = ComponentInstaller::new(&Gcloud::new(gcloud_path)).run(&request)?;
//! ```

mod installer;
mod request;

pub use installer::{ComponentInstaller, InstallOutcome, InstalledSet, InstalledState};
pub use request::ComponentRequest;
