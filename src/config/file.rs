//! Configuration file management
//!
//! Handles finding and loading YAML or JSON configuration files.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{BackendConfig, RunnerConfig};

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./trabas-e2e.yaml",
    "./trabas-e2e.yml",
    "./trabas-e2e.json",
    "~/.config/trabas-e2e/config.yaml",
];

/// Full configuration file structure
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load the given file, else a discovered one, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(Self::find) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        Ok(config)
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trabas-e2e.yaml");
        std::fs::write(
            &path,
            "runner:\n  client_id: yaml-client\n  grace_secs: 0\nbackend:\n  port: 3100\n",
        )
        .unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.runner.client_id, "yaml-client");
        assert_eq!(loaded.runner.grace_secs, 0);
        assert_eq!(loaded.backend.port, 3100);
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trabas-e2e.json");
        std::fs::write(&path, r#"{"runner": {"timeout_secs": 20, "format": "json"}}"#).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.runner.timeout_secs, 20);
        assert_eq!(loaded.runner.format, "json");
        assert_eq!(loaded.backend, BackendConfig::default());
    }

    #[test]
    fn test_load_or_default_uses_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.yml");
        std::fs::write(&path, "runner:\n  server_url: http://tunnel:9000\n").unwrap();

        let loaded = ConfigFile::load_or_default(Some(&path)).unwrap();
        assert_eq!(loaded.runner.server_url, "http://tunnel:9000");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "runner:\n  client_id: partial\n").unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.runner.client_id, "partial");
        assert_eq!(loaded.runner.server_url, "http://localhost:8001");
        assert_eq!(loaded.backend, BackendConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON config"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        assert!(ConfigFile::load_or_default(Some(&path)).is_err());
    }

    #[test]
    fn test_expand_path() {
        let path = expand_path("./test.yaml");
        assert_eq!(path, PathBuf::from("./test.yaml"));
    }
}
