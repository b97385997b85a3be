// src/cli/components.rs
//! Component commands

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ComponentsCommands {
    /// List locally installed components
    List {
        /// Directory that holds the google-cloud-sdk tree
        #[arg(long)]
        install_dir: Option<PathBuf>,
    },

    /// Install components that are not installed yet
    ///
    /// The SDK must already be present. Components already installed are
    /// skipped; the rest are installed in a single gcloud call.
    Install {
        /// Comma-separated component list (e.g. "cloud-run-proxy, beta")
        components: String,

        /// Directory that holds the google-cloud-sdk tree
        #[arg(long)]
        install_dir: Option<PathBuf>,
    },
}
