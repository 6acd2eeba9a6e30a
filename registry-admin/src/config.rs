use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "registry.toml";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SESSION_FILE: &str = ".registry-session.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            path: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl RegistryConfig {
    /// Load configuration with environment variable overrides.
    ///
    /// An explicit `path` must exist; the default `registry.toml` may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(default_path)?
                } else {
                    log::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    RegistryConfig::default()
                }
            }
        };

        config.apply_env_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("REGISTRY_API_URL").filter(|v| !v.trim().is_empty()) {
            log::debug!("Base URL overridden by REGISTRY_API_URL");
            self.api.base_url = base_url;
        }

        if let Some(path) = lookup("REGISTRY_SESSION_FILE").filter(|v| !v.trim().is_empty()) {
            self.session.path = PathBuf::from(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = RegistryConfig::from_toml_str("").unwrap();
        assert_eq!(config, RegistryConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_partial_file() {
        let config = RegistryConfig::from_toml_str(
            r#"
            [api]
            base_url = "http://registry.local:8080/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://registry.local:8080/api");
        assert_eq!(config.session.path, PathBuf::from(DEFAULT_SESSION_FILE));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let vars: HashMap<&str, &str> = [
            ("REGISTRY_API_URL", "http://10.0.0.5:3000"),
            ("REGISTRY_SESSION_FILE", "/tmp/session.json"),
        ]
        .into_iter()
        .collect();

        let mut config = RegistryConfig::default();
        config.apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://10.0.0.5:3000");
        assert_eq!(config.session.path, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = RegistryConfig::default();
        config.apply_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            RegistryConfig::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.toml");
        fs::write(&path, "[api\nbase_url = 3").unwrap();
        assert!(matches!(
            RegistryConfig::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
