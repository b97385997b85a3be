// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: SDK install directory
fn install_dir_arg() -> Arg {
    Arg::new("install_dir")
        .long("install-dir")
        .value_name("DIR")
        .help("Directory that holds the google-cloud-sdk tree")
}

fn provision_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("additional_components")
            .long("additional-components")
            .value_name("LIST")
            .help("Comma-separated components to install"),
    )
    .arg(install_dir_arg())
    .arg(
        Arg::new("download_url")
            .long("download-url")
            .value_name("URL")
            .help("SDK archive URL"),
    )
    .arg(
        Arg::new("sdk_archive")
            .long("sdk-archive")
            .value_name("PATH")
            .help("Local SDK archive to use instead of downloading"),
    )
    .arg(
        Arg::new("target_user")
            .long("target-user")
            .value_name("USER")
            .help("User to provision for when running as root"),
    )
    .arg(
        Arg::new("profile_dir")
            .long("profile-dir")
            .value_name("DIR")
            .help("System-wide profile directory for the PATH snippet"),
    )
}

fn build_cli() -> Command {
    Command::new("cloudsdk-provision")
        .version(env!("CARGO_PKG_VERSION"))
        .author("cloudsdk-provision Contributors")
        .about("Install the Google Cloud SDK and extra components in a dev container")
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Options file (TOML)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(provision_args(
            Command::new("install").about("Install the SDK if missing, then any missing components"),
        ))
        .subcommand(provision_args(
            Command::new("status").about("Show the resolved install mode, target user, and SDK location"),
        ))
        .subcommand(
            Command::new("components")
                .about("Inspect or install SDK components")
                .subcommand(
                    Command::new("list")
                        .about("List locally installed components")
                        .arg(install_dir_arg()),
                )
                .subcommand(
                    Command::new("install")
                        .about("Install components that are not installed yet")
                        .arg(Arg::new("components").required(true).help("Comma-separated component list"))
                        .arg(install_dir_arg()),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("cloudsdk-provision.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
