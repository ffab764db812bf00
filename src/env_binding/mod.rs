//! Reconciliation of the located runtime with the child process environment.
//!
//! The binding is computed as explicit data first and applied second, so the
//! planning step can be exercised in tests without mutating the real process
//! environment or a real erl.ini.

mod ini;

pub use ini::ErlIni;

use crate::error::Result;
use crate::platform::{self, PlatformKind};
use crate::runtime::RuntimeLocation;
use std::env;
use std::path::PathBuf;

pub const ERLANG_HOME_VAR: &str = "ERLANG_HOME";
pub const SEARCH_PATH_VAR: &str = "PATH";
pub const ERL_INI_SECTION: &str = "erlang";
pub const ERL_INI_BINDIR_KEY: &str = "Bindir";
pub const ERL_INI_ROOTDIR_KEY: &str = "Rootdir";

/// Platform-specific mechanism that makes the runtime visible to the child.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EnvBinding {
    /// POSIX: prepend the ERTS bin directory to the process search path.
    SearchPath { var: String, prepend: PathBuf },
    /// Windows: export ERLANG_HOME and rewrite `bin/erl.ini` in place.
    ErlIni {
        home_var: String,
        home: PathBuf,
        ini_path: PathBuf,
        bin_dir: PathBuf,
        root_dir: PathBuf,
    },
}

/// Compute the binding for the given platform and resolved runtime. Pure.
pub fn plan_binding(platform: PlatformKind, runtime: &RuntimeLocation) -> EnvBinding {
    match platform {
        PlatformKind::PosixLike => EnvBinding::SearchPath {
            var: SEARCH_PATH_VAR.to_string(),
            prepend: runtime.erts_bin_dir.clone(),
        },
        PlatformKind::Windows => EnvBinding::ErlIni {
            home_var: ERLANG_HOME_VAR.to_string(),
            home: runtime.root.clone(),
            ini_path: runtime.root.join("bin").join("erl.ini"),
            bin_dir: runtime.erts_bin_dir.clone(),
            root_dir: runtime.root.clone(),
        },
    }
}

impl EnvBinding {
    /// Apply the binding to the current process. Environment mutations are
    /// scoped to this process and its children; the ini rewrite is persisted.
    pub fn apply(&self, platform: PlatformKind) -> Result<()> {
        match self {
            EnvBinding::SearchPath { var, prepend } => {
                let existing = env::var(var).unwrap_or_default();
                let sep = platform::path_separator(platform);
                let updated =
                    prepend_search_path(&prepend.display().to_string(), &existing, sep);
                log::debug!("Prepending {} to {var}", prepend.display());
                // Single writer, before the child exists; no other thread
                // reads the environment concurrently.
                unsafe { env::set_var(var, updated) };
            }
            EnvBinding::ErlIni {
                home_var,
                home,
                ini_path,
                bin_dir,
                root_dir,
            } => {
                log::debug!("Setting {home_var}={}", home.display());
                unsafe { env::set_var(home_var, home.as_os_str()) };

                let mut ini = ErlIni::read(ini_path)?;
                ini.set(
                    ERL_INI_SECTION,
                    ERL_INI_BINDIR_KEY,
                    &escape_backslashes(&bin_dir.display().to_string()),
                )?;
                ini.set(
                    ERL_INI_SECTION,
                    ERL_INI_ROOTDIR_KEY,
                    &escape_backslashes(&root_dir.display().to_string()),
                )?;
                ini.write(ini_path)?;
                log::info!("Rewrote {}", ini_path.display());
            }
        }
        Ok(())
    }
}

/// Prepend `new` to the search-path value `existing` using `sep`. The
/// existing contents are preserved unchanged after the separator.
pub fn prepend_search_path(new: &str, existing: &str, sep: char) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}{sep}{existing}")
    }
}

/// erl.ini stores Windows paths with doubled backslashes.
pub fn escape_backslashes(path: &str) -> String {
    path.replace('\\', "\\\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn posix_runtime() -> RuntimeLocation {
        RuntimeLocation {
            root: PathBuf::from("/opt/erlang/lib/erlang"),
            erts_bin_dir: PathBuf::from("/opt/erlang/lib/erlang/erts-14.2/bin"),
        }
    }

    #[test]
    fn test_prepend_search_path() {
        let updated = prepend_search_path("/opt/erts/bin", "/usr/bin:/bin", ':');
        assert_eq!(updated, "/opt/erts/bin:/usr/bin:/bin");
    }

    #[test]
    fn test_prepend_to_empty_path() {
        assert_eq!(prepend_search_path("/opt/erts/bin", "", ':'), "/opt/erts/bin");
    }

    #[test]
    fn test_escape_backslashes() {
        assert_eq!(
            escape_backslashes(r"C:\erlang\bin"),
            r"C:\\erlang\\bin"
        );
        assert_eq!(escape_backslashes("/opt/erlang"), "/opt/erlang");
    }

    #[test]
    fn test_plan_posix_binding() {
        let binding = plan_binding(PlatformKind::PosixLike, &posix_runtime());
        assert_eq!(
            binding,
            EnvBinding::SearchPath {
                var: "PATH".to_string(),
                prepend: PathBuf::from("/opt/erlang/lib/erlang/erts-14.2/bin"),
            }
        );
    }

    #[test]
    fn test_plan_windows_binding_targets_erl_ini() {
        let runtime = RuntimeLocation {
            root: PathBuf::from(r"C:\app\external\erlang"),
            erts_bin_dir: PathBuf::from(r"C:\app\external\erlang\erts-14.2\bin"),
        };
        match plan_binding(PlatformKind::Windows, &runtime) {
            EnvBinding::ErlIni {
                home_var,
                ini_path,
                ..
            } => {
                assert_eq!(home_var, "ERLANG_HOME");
                assert_eq!(
                    ini_path,
                    Path::new(r"C:\app\external\erlang").join("bin").join("erl.ini")
                );
            }
            other => panic!("unexpected binding: {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_apply_search_path_prepends_once() {
        let var = "BURROW_TEST_PATH";
        unsafe { env::set_var(var, "/usr/bin:/bin") };

        let binding = EnvBinding::SearchPath {
            var: var.to_string(),
            prepend: PathBuf::from("/opt/erts/bin"),
        };
        binding.apply(PlatformKind::PosixLike).unwrap();

        assert_eq!(env::var(var).unwrap(), "/opt/erts/bin:/usr/bin:/bin");
        unsafe { env::remove_var(var) };
    }

    #[test]
    #[serial]
    fn test_apply_erl_ini_rewrite() {
        let temp_dir = TempDir::new().unwrap();
        let bin = temp_dir.path().join("bin");
        fs::create_dir(&bin).unwrap();
        let ini_path = bin.join("erl.ini");
        fs::write(
            &ini_path,
            "[erlang]\nBindir=old\nProgname=erl\nRootdir=old\n",
        )
        .unwrap();

        let binding = EnvBinding::ErlIni {
            home_var: "BURROW_TEST_ERLANG_HOME".to_string(),
            home: temp_dir.path().to_path_buf(),
            ini_path: ini_path.clone(),
            bin_dir: PathBuf::from(r"C:\erl\erts-14.2\bin"),
            root_dir: PathBuf::from(r"C:\erl"),
        };
        binding.apply(PlatformKind::Windows).unwrap();

        let rewritten = fs::read_to_string(&ini_path).unwrap();
        assert!(rewritten.contains(r"Bindir=C:\\erl\\erts-14.2\\bin"));
        assert!(rewritten.contains(r"Rootdir=C:\\erl"));
        assert!(rewritten.contains("Progname=erl"));
        assert_eq!(
            env::var("BURROW_TEST_ERLANG_HOME").unwrap(),
            temp_dir.path().display().to_string()
        );
        unsafe { env::remove_var("BURROW_TEST_ERLANG_HOME") };
    }
}
