use crate::error::{LaunchError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "burrow.toml";
const DEFAULT_ERLANG_DIR: &str = "external/erlang";
const DEFAULT_SERVER_DIR: &str = "external/rabbitmq_server";

/// Launcher configuration, loaded from an optional `burrow.toml` beside the
/// executable. Every field has a default matching the bundle layout the
/// packaging step produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurrowConfig {
    /// Bundle subdirectory holding the Erlang/OTP distribution.
    #[serde(default = "default_erlang_dir")]
    pub erlang_dir: String,

    /// Bundle subdirectory holding the RabbitMQ server distribution.
    #[serde(default = "default_server_dir")]
    pub server_dir: String,

    /// Node name passed to the server via RABBITMQ_NODENAME.
    #[serde(default)]
    pub node_name: Option<String>,
}

impl Default for BurrowConfig {
    fn default() -> Self {
        Self {
            erlang_dir: DEFAULT_ERLANG_DIR.to_string(),
            server_dir: DEFAULT_SERVER_DIR.to_string(),
            node_name: None,
        }
    }
}

fn default_erlang_dir() -> String {
    DEFAULT_ERLANG_DIR.to_string()
}

fn default_server_dir() -> String {
    DEFAULT_SERVER_DIR.to_string()
}

impl BurrowConfig {
    pub fn load(bundle_root: &Path) -> Result<Self> {
        let config_path = bundle_root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            log::debug!("Config file not found at {config_path:?}, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: BurrowConfig = toml::from_str(&contents)
            .map_err(|e| LaunchError::ConfigFile(format!("Failed to parse burrow.toml: {e}")))?;

        log::debug!("Loaded config from {config_path:?}");
        Ok(config)
    }

    pub fn erlang_root(&self, bundle_root: &Path) -> PathBuf {
        bundle_root.join(&self.erlang_dir)
    }

    pub fn server_sbin_dir(&self, bundle_root: &Path) -> PathBuf {
        bundle_root.join(&self.server_dir).join("sbin")
    }
}

/// Resolve the bundle root: an explicit override, or the directory containing
/// the current executable.
pub fn resolve_bundle_root(override_root: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = override_root {
        return Ok(root.to_path_buf());
    }

    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| LaunchError::SystemError("Executable has no parent directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = BurrowConfig::default();
        assert_eq!(config.erlang_dir, "external/erlang");
        assert_eq!(config.server_dir, "external/rabbitmq_server");
        assert_eq!(config.node_name, None);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = BurrowConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.erlang_dir, "external/erlang");
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("burrow.toml"),
            "node_name = \"rabbit@localhost\"\n",
        )
        .unwrap();

        let config = BurrowConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.node_name.as_deref(), Some("rabbit@localhost"));
        assert_eq!(config.server_dir, "external/rabbitmq_server");
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("burrow.toml"), "node_name = [broken").unwrap();

        let err = BurrowConfig::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, LaunchError::ConfigFile(_)));
    }

    #[test]
    fn test_layout_paths() {
        let config = BurrowConfig::default();
        let root = Path::new("/opt/app");
        assert_eq!(
            config.erlang_root(root),
            Path::new("/opt/app/external/erlang")
        );
        assert_eq!(
            config.server_sbin_dir(root),
            Path::new("/opt/app/external/rabbitmq_server/sbin")
        );
    }
}
