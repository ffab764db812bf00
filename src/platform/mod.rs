//! Host platform classification and platform-specific constants.
//!
//! The launcher branches on exactly one value, [`PlatformKind`], classified
//! once at startup and handed down explicitly to every component that needs
//! it. Unsupported hosts fail before any other logic runs.

mod constants;

pub use constants::{epmd_binary_name, path_separator, server_script_name};

use crate::error::{LaunchError, Result};

/// Operating system family the launcher is running on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlatformKind {
    Windows,
    PosixLike,
}

impl PlatformKind {
    /// Classify the host operating system.
    ///
    /// Anything that is neither Windows nor a known POSIX family member is
    /// fatal; there is no degraded mode.
    pub fn classify() -> Result<Self> {
        Self::from_os_name(std::env::consts::OS)
    }

    pub(crate) fn from_os_name(os: &str) -> Result<Self> {
        match os {
            "windows" => Ok(PlatformKind::Windows),
            "linux" | "macos" | "freebsd" | "netbsd" | "openbsd" | "dragonfly" | "solaris"
            | "illumos" => Ok(PlatformKind::PosixLike),
            other => Err(LaunchError::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn is_windows(self) -> bool {
        self == PlatformKind::Windows
    }
}
