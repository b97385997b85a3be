// src/provision.rs

//! The provisioning step, start to finish
//!
//! Order matters: the SDK must be present and `gcloud` resolvable before any
//! component work starts. A missing binary after the install step stops the
//! run before the component query is attempted.

use crate::components::{ComponentInstaller, ComponentRequest, InstallOutcome};
use crate::config::FeatureOptions;
use crate::error::Result;
use crate::mode::InstallMode;
use crate::prereq::{Tool, REQUIRED_TOOLS};
use crate::sdk::{ArchiveSource, SdkInstaller, SdkLayout, SdkStatus};
use crate::vendor::Gcloud;
use std::path::PathBuf;
use tracing::info;

/// Summary of a provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub sdk: SdkStatus,
    pub components: InstallOutcome,
}

impl ProvisionReport {
    /// Whether this run changed anything on disk
    pub fn changed(&self) -> bool {
        matches!(self.sdk, SdkStatus::Installed(_)) || self.components.changed()
    }
}

/// Provisions the SDK and requested components for one mode
pub struct Provisioner {
    mode: InstallMode,
    options: FeatureOptions,
    search_path: bool,
    required_tools: &'static [Tool],
}

impl Provisioner {
    pub fn new(mode: InstallMode, options: FeatureOptions) -> Self {
        Self {
            mode,
            options,
            search_path: true,
            required_tools: REQUIRED_TOOLS,
        }
    }

    /// Whether a `gcloud` already on `PATH` satisfies the SDK step
    pub fn with_path_search(mut self, enabled: bool) -> Self {
        self.search_path = enabled;
        self
    }

    /// Tools checked before the vendor installer runs
    pub fn with_required_tools(mut self, tools: &'static [Tool]) -> Self {
        self.required_tools = tools;
        self
    }

    pub fn mode(&self) -> &InstallMode {
        &self.mode
    }

    pub fn options(&self) -> &FeatureOptions {
        &self.options
    }

    /// Directory that holds the `google-cloud-sdk` tree
    pub fn install_dir(&self) -> PathBuf {
        self.options
            .install_dir
            .clone()
            .unwrap_or_else(|| self.mode.target().home.clone())
    }

    pub fn layout(&self) -> SdkLayout {
        SdkLayout::new(self.install_dir())
    }

    fn archive_source(&self) -> ArchiveSource {
        ArchiveSource::select(self.options.download_url(), self.options.sdk_archive.as_deref())
    }

    /// Install the SDK if it is missing
    pub fn ensure_sdk(&self) -> Result<SdkStatus> {
        SdkInstaller::new(self.layout(), &self.mode, self.archive_source())
            .with_profile_dir(self.options.profile_dir())
            .with_path_search(self.search_path)
            .with_required_tools(self.required_tools)
            .ensure()
    }

    /// The vendor CLI of an already provisioned SDK
    pub fn vendor(&self) -> Result<Gcloud> {
        self.layout()
            .resolve_gcloud(self.search_path)
            .map(Gcloud::new)
    }

    /// Install missing components from `request` with the given CLI
    pub fn install_components(
        &self,
        gcloud: &Gcloud,
        request: &ComponentRequest,
    ) -> Result<InstallOutcome> {
        ComponentInstaller::new(gcloud).run(request)
    }

    /// Run the whole provisioning step
    pub fn run(&self) -> Result<ProvisionReport> {
        info!(
            "Provisioning Cloud SDK in {} ({} mode)",
            self.install_dir().display(),
            self.mode
        );

        let sdk = self.ensure_sdk()?;
        let gcloud = Gcloud::new(sdk.gcloud());

        let request = ComponentRequest::parse(self.options.components_raw());
        let components = self.install_components(&gcloud, &request)?;

        Ok(ProvisionReport { sdk, components })
    }
}
