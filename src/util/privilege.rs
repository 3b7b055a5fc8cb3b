//! Privilege checks for local-mode (`kadmin.local`) operation.

use anyhow::{bail, Result};

/// Check if the current process is running as root (euid 0).
pub fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Local mode opens the KDC database directly, which needs root.
pub fn require_root(action: &str) -> Result<()> {
    if !is_root() {
        bail!(
            "'{}' in local mode (kadmin.local) requires root privileges. Run with sudo or pass --admin-principal.",
            action
        );
    }
    Ok(())
}
