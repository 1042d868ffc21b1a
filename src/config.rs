//! Configuration loading.
//!
//! Configuration lives in a YAML file, by default `<config dir>/luatag/config.yaml`.
//! Every field is optional.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Runtime configuration for the Lua engine and host API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strip dangerous globals before running scripts.
    pub sandbox: bool,
    /// Table the host API is registered under. Empty registers plain globals.
    pub namespace: String,
    /// Globals removed in addition to the built-in sandbox list.
    pub blocked_globals: Vec<String>,
    /// Values scripts can read through `get_param`.
    pub params: BTreeMap<String, serde_json::Value>,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sandbox: true,
            namespace: "host".to_string(),
            blocked_globals: Vec::new(),
            params: BTreeMap::new(),
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Parse configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Load an explicitly given file, or the default file if it exists, or defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}

/// Default configuration file location.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "luatag").map(|dirs| dirs.config_dir().join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.sandbox);
        assert_eq!(config.namespace, "host");
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = Config::from_yaml(
            r#"
namespace: api
params:
  threshold: 0.5
  label: fast
"#,
        )
        .unwrap();
        assert_eq!(config.namespace, "api");
        assert!(config.sandbox);
        assert_eq!(config.params["threshold"], serde_json::json!(0.5));
        assert_eq!(config.params["label"], serde_json::json!("fast"));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = Config::from_yaml("sandbox: [not, a, bool]");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "sandbox: false\nblocked_globals: [string]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.sandbox);
        assert_eq!(config.blocked_globals, vec!["string"]);
    }

    #[test]
    fn test_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let result = Config::resolve(Some(&temp.path().join("absent.yaml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
