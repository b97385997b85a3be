// src/sdk/install.rs

//! Post-extraction steps: vendor installer, PATH snippet, ownership

use crate::error::{Error, Result};
use crate::mode::TargetUser;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::SdkLayout;

/// Run the SDK's own `install.sh` non-interactively
///
/// `path_update` lets the vendor installer edit the invoking user's shell rc
/// file; privileged runs write a system-wide snippet instead.
pub fn run_vendor_installer(layout: &SdkLayout, path_update: bool) -> Result<()> {
    let script = layout.install_script();
    if !script.is_file() {
        return Err(Error::InstallerError(format!(
            "install script not found at {}",
            script.display()
        )));
    }

    let args = installer_args(path_update);
    info!("Running {} {}", script.display(), args.join(" "));

    let output = Command::new("bash")
        .arg(&script)
        .args(&args)
        .env("CLOUDSDK_CORE_DISABLE_PROMPTS", "1")
        .current_dir(layout.root())
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::InstallerError(format!("Failed to run {}: {e}", script.display())))?;

    debug!("install.sh stdout: {}", String::from_utf8_lossy(&output.stdout).trim());

    if !output.status.success() {
        return Err(Error::InstallerError(format!(
            "{} exited with {}: {}",
            script.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}

fn installer_args(path_update: bool) -> Vec<String> {
    vec![
        "--quiet".to_string(),
        "--usage-reporting=false".to_string(),
        "--command-completion=false".to_string(),
        format!("--path-update={path_update}"),
    ]
}

/// Shell snippet that puts the SDK `bin` directory on `PATH`
pub fn profile_snippet(bin_dir: &Path) -> String {
    let bin = bin_dir.display();
    format!(
        "# Google Cloud SDK, written by cloudsdk-provision\n\
         if [ -d \"{bin}\" ]; then\n\
         \x20   case \":$PATH:\" in\n\
         \x20       *\":{bin}:\"*) ;;\n\
         \x20       *) export PATH=\"{bin}:$PATH\" ;;\n\
         \x20   esac\n\
         fi\n"
    )
}

/// Write the PATH snippet into the system-wide profile directory
pub fn write_profile_snippet(layout: &SdkLayout, profile_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(profile_dir).map_err(|e| {
        Error::IoError(format!("Failed to create {}: {e}", profile_dir.display()))
    })?;

    let path = profile_dir.join(super::PROFILE_SNIPPET_NAME);
    std::fs::write(&path, profile_snippet(&layout.bin_dir()))
        .map_err(|e| Error::IoError(format!("Failed to write {}: {e}", path.display())))?;

    info!("Wrote PATH snippet to {}", path.display());
    Ok(path)
}

/// Hand the SDK tree over to the target user
pub fn chown_tree(root: &Path, user: &TargetUser) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| Error::IoError(format!("Failed to walk {}: {e}", root.display())))?;
        std::os::unix::fs::lchown(entry.path(), Some(user.uid), Some(user.gid)).map_err(|e| {
            Error::IoError(format!(
                "Failed to set ownership on {}: {e}",
                entry.path().display()
            ))
        })?;
        count += 1;
    }
    debug!("Changed ownership of {} paths to {}", count, user.name);
    Ok(count)
}

/// Record that every install step finished
///
/// The marker is owned by `owner` when the tree was handed over.
pub fn mark_complete(layout: &SdkLayout, owner: Option<&TargetUser>) -> Result<()> {
    let marker = layout.marker();
    std::fs::write(&marker, b"")
        .map_err(|e| Error::IoError(format!("Failed to write {}: {e}", marker.display())))?;
    if let Some(user) = owner {
        std::os::unix::fs::lchown(&marker, Some(user.uid), Some(user.gid)).map_err(|e| {
            Error::IoError(format!("Failed to set ownership on {}: {e}", marker.display()))
        })?;
    }
    debug!("Marked {} complete", layout.root().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installer_args() {
        assert_eq!(
            installer_args(false),
            vec![
                "--quiet",
                "--usage-reporting=false",
                "--command-completion=false",
                "--path-update=false",
            ]
        );
        assert!(installer_args(true).contains(&"--path-update=true".to_string()));
    }

    #[test]
    fn test_profile_snippet() {
        let snippet = profile_snippet(Path::new("/home/vscode/google-cloud-sdk/bin"));
        assert!(snippet.contains("export PATH=\"/home/vscode/google-cloud-sdk/bin:$PATH\""));
        assert!(snippet.contains("    case \":$PATH:\" in\n"));
        assert!(snippet.ends_with("fi\n"));
    }

    #[test]
    fn test_write_profile_snippet() {
        let temp = tempfile::tempdir().unwrap();
        let layout = SdkLayout::new(temp.path());
        let profile_dir = temp.path().join("profile.d");

        let path = write_profile_snippet(&layout, &profile_dir).unwrap();
        assert_eq!(path, profile_dir.join("google-cloud-sdk.sh"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains(&layout.bin_dir().display().to_string()));
    }

    #[test]
    fn test_missing_install_script() {
        let temp = tempfile::tempdir().unwrap();
        let layout = SdkLayout::new(temp.path());
        let err = run_vendor_installer(&layout, false).unwrap_err();
        assert!(matches!(err, Error::InstallerError(_)));
    }

    #[test]
    fn test_mark_complete() {
        let temp = tempfile::tempdir().unwrap();
        let layout = SdkLayout::new(temp.path());
        std::fs::create_dir_all(layout.bin_dir()).unwrap();
        std::fs::write(layout.gcloud(), b"#!/bin/sh\n").unwrap();
        assert!(!layout.is_installed());

        mark_complete(&layout, None).unwrap();
        assert!(layout.is_installed());
    }

    #[test]
    fn test_chown_tree_to_self() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("a/b")).unwrap();
        std::fs::write(temp.path().join("a/b/file"), b"x").unwrap();

        // Changing ownership to ourselves needs no privilege
        let me = TargetUser {
            name: "self".to_string(),
            home: temp.path().to_path_buf(),
            uid: nix::unistd::geteuid().as_raw(),
            gid: nix::unistd::getegid().as_raw(),
        };
        assert_eq!(chown_tree(temp.path(), &me).unwrap(), 4);
    }
}
