// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io;

mod cli;
mod commands;

use cli::{Cli, Commands, ComponentsCommands, ProvisionArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for command output
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        None => commands::cmd_install(config, ProvisionArgs::default().into()),
        Some(Commands::Install(args)) => commands::cmd_install(config, args.into()),
        Some(Commands::Status(args)) => commands::cmd_status(config, args.into()),
        Some(Commands::Components(ComponentsCommands::List { install_dir })) => {
            commands::cmd_components_list(config, install_dir)
        }
        Some(Commands::Components(ComponentsCommands::Install {
            components,
            install_dir,
        })) => commands::cmd_components_install(config, &components, install_dir),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "cloudsdk-provision",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
