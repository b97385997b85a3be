// src/cli/mod.rs
//! CLI definitions for cloudsdk-provision
//!
//! Flags here map one to one onto `FeatureOptions`, the highest priority
//! layer. Handlers that act on them live under `commands`.
//!
//! Running without a subcommand performs the full provisioning step, which
//! is how a dev container build invokes the tool.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use cloudsdk_provision::FeatureOptions;
use std::path::PathBuf;

mod components;

pub use components::ComponentsCommands;

#[derive(Parser)]
#[command(name = "cloudsdk-provision")]
#[command(author = "cloudsdk-provision Contributors")]
#[command(version)]
#[command(about = "Install the Google Cloud SDK and extra components in a dev container", long_about = None)]
pub struct Cli {
    /// Options file (TOML); defaults to /etc/cloudsdk-provision.toml if present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install the SDK if missing, then any missing components
    Install(ProvisionArgs),

    /// Inspect or install SDK components
    #[command(subcommand)]
    Components(ComponentsCommands),

    /// Show the resolved install mode, target user, and SDK location
    Status(ProvisionArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Flags that override every other option channel
#[derive(Args, Debug, Clone, Default)]
pub struct ProvisionArgs {
    /// Comma-separated components to install (e.g. "cloud-run-proxy, beta")
    #[arg(long, visible_alias = "additionalComponents")]
    pub additional_components: Option<String>,

    /// Directory that receives the google-cloud-sdk tree
    #[arg(long)]
    pub install_dir: Option<PathBuf>,

    /// SDK archive URL
    #[arg(long)]
    pub download_url: Option<String>,

    /// Local SDK archive to use instead of downloading
    #[arg(long)]
    pub sdk_archive: Option<PathBuf>,

    /// User to provision for when running as root
    #[arg(long)]
    pub target_user: Option<String>,

    /// System-wide profile directory for the PATH snippet
    #[arg(long)]
    pub profile_dir: Option<PathBuf>,
}

impl From<ProvisionArgs> for FeatureOptions {
    fn from(args: ProvisionArgs) -> Self {
        FeatureOptions {
            additional_components: args.additional_components,
            install_dir: args.install_dir,
            download_url: args.download_url,
            sdk_archive: args.sdk_archive,
            target_user: args.target_user,
            profile_dir: args.profile_dir,
        }
    }
}
