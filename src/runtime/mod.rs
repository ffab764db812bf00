//! Location of the bundled Erlang/OTP runtime on disk.

mod locate;

pub use locate::locate_versioned_dir;

use crate::config::BurrowConfig;
use crate::error::Result;
use crate::platform::PlatformKind;
use std::path::{Path, PathBuf};

/// Directory name prefix of the version-dependent ERTS subdirectory. The
/// version suffix is unknown at build time.
pub const ERTS_DIR_PREFIX: &str = "erts-";

/// Resolved location of the bundled Erlang runtime.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuntimeLocation {
    /// Absolute path to the Erlang installation root.
    pub root: PathBuf,
    /// Absolute path to the versioned ERTS bin directory.
    pub erts_bin_dir: PathBuf,
}

impl RuntimeLocation {
    /// Discover the bundled runtime under the configured bundle layout.
    ///
    /// On Windows the `erts-*` directory sits directly under the Erlang
    /// root; on POSIX installs it lives under `lib/erlang`.
    pub fn discover(
        platform: PlatformKind,
        config: &BurrowConfig,
        bundle_root: &Path,
    ) -> Result<Self> {
        let root = absolutize(&config.erlang_root(bundle_root));

        let erts_parent = match platform {
            PlatformKind::Windows => root.clone(),
            PlatformKind::PosixLike => root.join("lib").join("erlang"),
        };

        let erts_dir = locate_versioned_dir(&erts_parent, ERTS_DIR_PREFIX)?;
        let erts_bin_dir = erts_dir.join("bin");

        log::info!("Resolved runtime at {}", root.display());
        Ok(Self { root, erts_bin_dir })
    }
}

/// Make a path absolute against the current working directory without
/// touching the filesystem. `fs::canonicalize` is avoided on purpose: on
/// Windows it produces `\\?\` verbatim paths, which erl.ini must not contain.
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
