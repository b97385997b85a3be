// src/components/installer.rs

use crate::error::Result;
use crate::vendor::VendorCli;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::ComponentRequest;

/// Component identifiers registered as locally installed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledSet {
    ids: HashSet<String>,
}

impl InstalledSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers in sorted order
    pub fn sorted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl<S: Into<String>> FromIterator<S> for InstalledSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Local component state as far as it could be determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstalledState {
    /// The vendor CLI answered the query
    Known(InstalledSet),
    /// The query failed; nothing is assumed to be installed
    Unknown,
}

impl InstalledState {
    /// Query the vendor CLI, degrading to [`InstalledState::Unknown`] on failure
    pub fn query(vendor: &dyn VendorCli) -> Self {
        match vendor.list_installed() {
            Ok(ids) => {
                debug!("{} components installed locally", ids.len());
                Self::Known(ids.into_iter().collect())
            }
            Err(e) => {
                warn!("{}; installing every requested component", e);
                Self::Unknown
            }
        }
    }

    pub fn is_installed(&self, id: &str) -> bool {
        match self {
            Self::Known(set) => set.contains(id),
            Self::Unknown => false,
        }
    }

    /// Requested identifiers not yet installed, in request order
    pub fn missing_from(&self, request: &ComponentRequest) -> Vec<String> {
        request
            .iter()
            .filter(|id| !self.is_installed(id))
            .map(String::from)
            .collect()
    }
}

/// What [`ComponentInstaller::run`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The request was empty; the vendor CLI was not called
    NothingRequested,
    /// Every requested component was already installed
    AlreadyInstalled,
    /// One batched install covered these components
    Installed(Vec<String>),
}

impl InstallOutcome {
    /// Whether the vendor install call was issued
    pub fn changed(&self) -> bool {
        matches!(self, Self::Installed(_))
    }
}

/// Installs requested components that are not present yet
pub struct ComponentInstaller<'a> {
    vendor: &'a dyn VendorCli,
}

impl<'a> ComponentInstaller<'a> {
    pub fn new(vendor: &'a dyn VendorCli) -> Self {
        Self { vendor }
    }

    /// Parse `raw` and install what is missing
    pub fn run_raw(&self, raw: &str) -> Result<InstallOutcome> {
        self.run(&ComponentRequest::parse(raw))
    }

    /// Install the components of `request` that are missing
    ///
    /// Only the final install call can fail this; a failed local-state query
    /// falls back to installing the whole request.
    pub fn run(&self, request: &ComponentRequest) -> Result<InstallOutcome> {
        if request.is_empty() {
            debug!("No additional components requested");
            return Ok(InstallOutcome::NothingRequested);
        }

        let state = InstalledState::query(self.vendor);
        let to_install = state.missing_from(request);

        if to_install.is_empty() {
            info!("Requested components already installed: {}", request);
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        info!("Installing components: {}", to_install.join(", "));
        self.vendor.install(&to_install)?;
        Ok(InstallOutcome::Installed(to_install))
    }
}
