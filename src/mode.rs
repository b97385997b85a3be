// src/mode.rs

//! Install mode and target user resolution
//!
//! The mode is decided once at start from the effective uid. A privileged
//! run provisions the SDK for a target user (resolved from the hint) and
//! writes system-wide profile configuration; an unprivileged run provisions
//! for the invoking user only.

use crate::error::{Error, Result};
use nix::unistd::{Uid, User};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Identity used when the hint is missing or names an unknown account
pub const DEFAULT_TARGET_USER: &str = "vscode";

/// Hint values that ask for automatic resolution
const AUTOMATIC_HINTS: &[&str] = &["automatic", "auto", "none"];

/// Account the SDK is provisioned for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUser {
    pub name: String,
    pub home: PathBuf,
    pub uid: u32,
    pub gid: u32,
}

impl TargetUser {
    fn from_nix(user: User) -> Self {
        Self {
            name: user.name,
            home: user.dir,
            uid: user.uid.as_raw(),
            gid: user.gid.as_raw(),
        }
    }

    /// Look up an account by name
    pub fn lookup(name: &str) -> Result<Option<Self>> {
        User::from_name(name)
            .map(|u| u.map(Self::from_nix))
            .map_err(|e| Error::UserError(format!("Failed to look up user {name}: {e}")))
    }

    /// The account running this process
    pub fn current() -> Result<Self> {
        let uid = nix::unistd::geteuid();
        let user = User::from_uid(uid)
            .map_err(|e| Error::UserError(format!("Failed to look up uid {uid}: {e}")))?;

        match user {
            Some(user) => Ok(Self::from_nix(user)),
            // Containers sometimes run with an uid that has no passwd entry
            None => {
                let home = dirs::home_dir().ok_or_else(|| {
                    Error::UserError(format!("uid {uid} has no passwd entry and no HOME"))
                })?;
                Ok(Self {
                    name: uid.to_string(),
                    home,
                    uid: uid.as_raw(),
                    gid: nix::unistd::getegid().as_raw(),
                })
            }
        }
    }

    /// Resolve the target user from a hint
    ///
    /// Tries the hint, then [`DEFAULT_TARGET_USER`], then `root`.
    pub fn resolve(hint: Option<&str>) -> Result<Self> {
        let hint = hint.map(str::trim).filter(|h| {
            let lower = h.to_ascii_lowercase();
            !h.is_empty() && !AUTOMATIC_HINTS.contains(&lower.as_str())
        });

        let mut candidates = Vec::new();
        if let Some(h) = hint {
            candidates.push(h);
        }
        candidates.push(DEFAULT_TARGET_USER);
        candidates.push("root");

        for candidate in candidates {
            if let Some(user) = Self::lookup(candidate)? {
                if let Some(h) = hint.filter(|h| *h != user.name) {
                    warn!("User '{}' not found, provisioning for '{}'", h, user.name);
                }
                return Ok(user);
            }
            debug!("No account named '{}'", candidate);
        }

        Err(Error::UserError("no usable target user found".to_string()))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

impl fmt::Display for TargetUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (uid {}, home {})", self.name, self.uid, self.home.display())
    }
}

/// Deployment mode, resolved once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallMode {
    /// Running as root on behalf of a target user
    Privileged(TargetUser),
    /// Running as an ordinary user for that user
    User(TargetUser),
}

impl InstallMode {
    /// Detect the mode from the effective uid
    pub fn detect(target_hint: Option<&str>) -> Result<Self> {
        Self::for_uid(nix::unistd::geteuid(), target_hint)
    }

    fn for_uid(uid: Uid, target_hint: Option<&str>) -> Result<Self> {
        let mode = if uid.is_root() {
            Self::Privileged(TargetUser::resolve(target_hint)?)
        } else {
            if let Some(hint) = target_hint {
                debug!("Ignoring target user hint '{}' in unprivileged mode", hint);
            }
            Self::User(TargetUser::current()?)
        };
        info!("Install mode: {} for {}", mode.name(), mode.target().name);
        Ok(mode)
    }

    pub fn is_privileged(&self) -> bool {
        matches!(self, Self::Privileged(_))
    }

    pub fn target(&self) -> &TargetUser {
        match self {
            Self::Privileged(user) | Self::User(user) => user,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Privileged(_) => "privileged",
            Self::User(_) => "user",
        }
    }
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
