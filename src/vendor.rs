// src/vendor.rs

//! The vendor CLI seam
//!
//! [`VendorCli`] is the narrow interface the component installer needs from
//! `gcloud`: list what is installed locally and install a batch. [`Gcloud`]
//! implements it by running the binary.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Operations the component installer drives
pub trait VendorCli {
    /// Identifiers of components registered as locally installed
    fn list_installed(&self) -> Result<Vec<String>>;

    /// Install all `components` in one non-interactive call
    fn install(&self, components: &[String]) -> Result<()>;
}

/// `gcloud` run as a child process
#[derive(Debug, Clone)]
pub struct Gcloud {
    binary: PathBuf,
}

impl Gcloud {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn run(&self, args: &[&str]) -> std::io::Result<Output> {
        debug!("Running {} {}", self.binary.display(), args.join(" "));
        Command::new(&self.binary)
            .args(args)
            .env("CLOUDSDK_CORE_DISABLE_PROMPTS", "1")
            .stdin(Stdio::null())
            .output()
    }
}

impl VendorCli for Gcloud {
    fn list_installed(&self) -> Result<Vec<String>> {
        let output = self
            .run(&[
                "components",
                "list",
                "--only-local-state",
                "--format=value(id)",
                "--quiet",
            ])
            .map_err(|e| Error::QueryError(format!("Failed to run {}: {e}", self.binary.display())))?;

        if !output.status.success() {
            return Err(Error::QueryError(format!(
                "gcloud exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(parse_component_ids(&String::from_utf8_lossy(&output.stdout)))
    }

    fn install(&self, components: &[String]) -> Result<()> {
        if let Some(flag) = components.iter().find(|id| id.starts_with('-')) {
            return Err(Error::ComponentInstallError(format!(
                "'{flag}' is not a component id"
            )));
        }

        let mut args = vec!["components", "install", "--quiet"];
        args.extend(components.iter().map(String::as_str));

        let output = self.run(&args).map_err(|e| {
            Error::ComponentInstallError(format!("Failed to run {}: {e}", self.binary.display()))
        })?;

        debug!("gcloud stderr: {}", String::from_utf8_lossy(&output.stderr).trim());

        if !output.status.success() {
            return Err(Error::ComponentInstallError(format!(
                "gcloud exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

/// One identifier per non-empty line
fn parse_component_ids(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_gcloud(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("gcloud");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_parse_component_ids() {
        assert_eq!(
            parse_component_ids("core\n  bq\n\ngsutil\n"),
            vec!["core", "bq", "gsutil"]
        );
        assert!(parse_component_ids("\n\n").is_empty());
    }

    #[test]
    fn test_list_installed() {
        let temp = tempfile::tempdir().unwrap();
        let gcloud = Gcloud::new(fake_gcloud(temp.path(), "printf 'core\\nbq\\n'"));
        assert_eq!(gcloud.list_installed().unwrap(), vec!["core", "bq"]);
    }

    #[test]
    fn test_list_installed_failure_is_query_error() {
        let temp = tempfile::tempdir().unwrap();
        let gcloud = Gcloud::new(fake_gcloud(temp.path(), "echo nope >&2; exit 3"));
        let err = gcloud.list_installed().unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_install_passes_components() {
        let temp = tempfile::tempdir().unwrap();
        let log = temp.path().join("args");
        let gcloud = Gcloud::new(fake_gcloud(
            temp.path(),
            &format!("echo \"$@\" > {}", log.display()),
        ));

        gcloud
            .install(&["beta".to_string(), "kubectl".to_string()])
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&log).unwrap().trim(),
            "components install --quiet beta kubectl"
        );
    }

    #[test]
    fn test_install_failure_surfaces_stderr() {
        let temp = tempfile::tempdir().unwrap();
        let gcloud = Gcloud::new(fake_gcloud(
            temp.path(),
            "echo 'unknown component: nope' >&2; exit 1",
        ));
        let err = gcloud.install(&["nope".to_string()]).unwrap_err();
        assert!(matches!(err, Error::ComponentInstallError(_)));
        assert!(err.to_string().contains("unknown component: nope"));
    }

    #[test]
    fn test_install_rejects_flag_like_ids() {
        let temp = tempfile::tempdir().unwrap();
        let log = temp.path().join("args");
        let gcloud = Gcloud::new(fake_gcloud(
            temp.path(),
            &format!("echo \"$@\" > {}", log.display()),
        ));

        let err = gcloud
            .install(&["beta".to_string(), "--verbosity=debug".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::ComponentInstallError(_)));
        assert!(err.to_string().contains("--verbosity=debug"));
        assert!(!log.exists());
    }

    #[test]
    fn test_missing_binary() {
        let gcloud = Gcloud::new("/nonexistent/gcloud");
        assert!(matches!(gcloud.list_installed(), Err(Error::QueryError(_))));
        assert!(matches!(
            gcloud.install(&["beta".to_string()]),
            Err(Error::ComponentInstallError(_))
        ));
    }
}
