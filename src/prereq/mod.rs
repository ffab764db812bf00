//! Visual C++ redistributable detection and installation (Windows only).
//!
//! The runtime's NIFs link against the VC++ runtime, so the launcher checks
//! for an installed redistributable before first use and runs the bundled
//! installer when none is found.

#[cfg(windows)]
mod registry;

#[cfg(windows)]
pub use registry::WindowsRegistry;

use crate::error::{LaunchError, Result};
use crate::platform::PlatformKind;
use std::path::Path;
use std::process::Command;

/// Registry path holding one subkey per installed Visual Studio version.
pub const VENDOR_KEY_PATH: &str = r"SOFTWARE\WOW6432Node\Microsoft\VisualStudio";

/// Child key whose presence under a version entry marks the VC++ runtime.
pub const VC_MARKER_KEY: &str = "VC";

/// File name of the bundled redistributable installer.
pub const INSTALLER_NAME: &str = "vc_redist.x64.exe";

/// Read-only view of a registry-like hierarchical store. Abstracted so the
/// check logic runs against an in-memory tree in tests.
pub trait RedistStore {
    /// Names of the immediate subkeys of `path`, in their listed order. An
    /// absent `path` yields an empty list, not an error.
    fn subkeys(&self, path: &str) -> Result<Vec<String>>;

    fn has_subkey(&self, path: &str, name: &str) -> Result<bool>;
}

/// Check whether the VC++ redistributable is present.
///
/// Returns the first version entry (in listed order) that carries a `VC`
/// child, or `None` when no entry does. Calling this off Windows is a
/// precondition violation, never a silent no-op.
pub fn check_prerequisite(
    platform: PlatformKind,
    store: &dyn RedistStore,
) -> Result<Option<String>> {
    if !platform.is_windows() {
        return Err(LaunchError::PreconditionViolation(
            "VC++ redistributable check is only meaningful on Windows".to_string(),
        ));
    }

    for version in store.subkeys(VENDOR_KEY_PATH)? {
        let version_path = format!(r"{VENDOR_KEY_PATH}\{version}");
        if store.has_subkey(&version_path, VC_MARKER_KEY)? {
            log::info!("Found VC++ runtime under VisualStudio {version}");
            return Ok(Some(version));
        }
    }

    log::info!("No VC++ runtime found under {VENDOR_KEY_PATH}");
    Ok(None)
}

/// Run the bundled redistributable installer silently. A non-zero exit from
/// the installer aborts the launch; there is no retry.
pub fn install_prerequisite(installer: &Path) -> Result<()> {
    log::info!("Installing VC++ redistributable from {}", installer.display());

    let status = Command::new(installer)
        .args(["/install", "/quiet", "/norestart"])
        .status()
        .map_err(|e| {
            LaunchError::PrerequisiteInstall(format!(
                "Failed to run {}: {e}",
                installer.display()
            ))
        })?;

    if !status.success() {
        return Err(LaunchError::PrerequisiteInstall(format!(
            "{} exited with status {status}",
            installer.display()
        )));
    }

    Ok(())
}
