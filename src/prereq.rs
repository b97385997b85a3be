// src/prereq.rs

//! Required external tools
//!
//! The SDK installer is a bash script that drives a Python interpreter, so
//! both must be on `PATH` before it runs. A privileged run installs missing
//! tools through apt; an unprivileged run cannot and fails instead.

use crate::error::{Error, Result};
use crate::mode::InstallMode;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// A required command and the apt package that provides it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
    pub command: &'static str,
    pub package: &'static str,
}

/// Tools the SDK installer needs
pub const REQUIRED_TOOLS: &[Tool] = &[
    Tool { command: "bash", package: "bash" },
    Tool { command: "python3", package: "python3" },
];

/// Result of probing for required tools
#[derive(Debug)]
pub struct Prerequisites {
    missing: Vec<Tool>,
}

impl Prerequisites {
    /// Probe `PATH` for every tool in `tools`
    pub fn check(tools: &[Tool]) -> Self {
        Self::check_with(tools, |cmd| which::which(cmd).is_ok())
    }

    fn check_with(tools: &[Tool], present: impl Fn(&str) -> bool) -> Self {
        let missing = tools
            .iter()
            .copied()
            .filter(|tool| {
                let found = present(tool.command);
                debug!("Prerequisite {}: {}", tool.command, if found { "found" } else { "missing" });
                !found
            })
            .collect();
        Self { missing }
    }

    pub fn all_present(&self) -> bool {
        self.missing.is_empty()
    }

    /// Names of missing commands
    pub fn missing(&self) -> Vec<&'static str> {
        self.missing.iter().map(|t| t.command).collect()
    }

    /// Make sure every tool is present, installing them when privileged
    pub fn ensure(tools: &[Tool], mode: &InstallMode) -> Result<()> {
        let prereqs = Self::check(tools);
        if prereqs.all_present() {
            return Ok(());
        }

        if !mode.is_privileged() {
            return Err(Error::MissingPrerequisites(
                prereqs.missing().into_iter().map(String::from).collect(),
            ));
        }

        prereqs.install_missing()?;

        let recheck = Self::check(tools);
        if recheck.all_present() {
            Ok(())
        } else {
            Err(Error::MissingPrerequisites(
                recheck.missing().into_iter().map(String::from).collect(),
            ))
        }
    }

    fn install_missing(&self) -> Result<()> {
        let packages: Vec<&str> = self.missing.iter().map(|t| t.package).collect();
        info!("Installing missing prerequisites: {}", packages.join(", "));

        run_apt(&["update", "-y"])?;

        let mut args = vec!["install", "-y", "--no-install-recommends"];
        args.extend(&packages);
        run_apt(&args)
    }
}

fn run_apt(args: &[&str]) -> Result<()> {
    let status = Command::new("apt-get")
        .args(args)
        .env("DEBIAN_FRONTEND", "noninteractive")
        .stdin(Stdio::null())
        .status()
        .map_err(|e| {
            Error::MissingPrerequisites(vec![format!("apt-get ({e})")])
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::InstallerError(format!(
            "apt-get {} exited with {}",
            args.join(" "),
            status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_present() {
        let prereqs = Prerequisites::check_with(REQUIRED_TOOLS, |_| true);
        assert!(prereqs.all_present());
        assert!(prereqs.missing().is_empty());
    }

    #[test]
    fn test_missing_reported_in_order() {
        let prereqs = Prerequisites::check_with(REQUIRED_TOOLS, |_| false);
        assert!(!prereqs.all_present());
        assert_eq!(prereqs.missing(), vec!["bash", "python3"]);
    }

    #[test]
    fn test_ensure_without_tools_is_ok() {
        let mode = InstallMode::User(crate::mode::TargetUser::current().unwrap());
        assert!(Prerequisites::ensure(&[], &mode).is_ok());
    }

    #[test]
    fn test_unprivileged_missing_tool_is_fatal() {
        let mode = InstallMode::User(crate::mode::TargetUser::current().unwrap());
        let tools = [Tool {
            command: "cloudsdk-provision-no-such-tool",
            package: "no-such-package",
        }];
        match Prerequisites::ensure(&tools, &mode) {
            Err(Error::MissingPrerequisites(missing)) => {
                assert_eq!(missing, ["cloudsdk-provision-no-such-tool"]);
            }
            other => panic!("expected missing prerequisites, got {other:?}"),
        }
    }

    #[test]
    fn test_partial() {
        let prereqs = Prerequisites::check_with(REQUIRED_TOOLS, |cmd| cmd == "bash");
        assert_eq!(prereqs.missing(), vec!["python3"]);
    }
}
