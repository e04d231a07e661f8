//! Server instance configuration.

use crate::ClientError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn default_timeout() -> u64 {
    30
}

fn default_verify_tls() -> bool {
    true
}

/// Connection settings for one server instance. Credentials and TLS policy
/// are fixed at client construction and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl InstanceConfig {
    pub fn new(url: &str, user: &str, password: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_owned(),
            user: user.to_owned(),
            password: password.to_owned(),
            verify_tls: true,
            timeout_secs: default_timeout(),
        }
    }

    #[must_use]
    pub fn insecure(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Named instances, loaded from `~/.config/geobridge/instances.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Instances {
    #[serde(default)]
    pub instance: BTreeMap<String, InstanceConfig>,
}

impl Instances {
    pub fn load_default() -> Result<Self, ClientError> {
        Self::load(&default_config_path()?)
    }

    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ClientError::Config(format!("invalid config: {e}")))
    }

    pub fn save(&self, path: &Path) -> Result<(), ClientError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::Config(format!("serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&InstanceConfig> {
        self.instance.get(name)
    }
}

fn default_config_path() -> Result<PathBuf, ClientError> {
    let home =
        std::env::var("HOME").map_err(|_| ClientError::Config("HOME not set".to_owned()))?;
    Ok(PathBuf::from(home).join(".config/geobridge/instances.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_trailing_slash_stripped() {
        let config = InstanceConfig::new("http://localhost:8080/geoserver/", "admin", "pw");
        assert_eq!(config.url, "http://localhost:8080/geoserver");
    }

    #[test]
    fn instances_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instances.toml");

        let mut instances = Instances::default();
        instances.instance.insert(
            "staging".to_owned(),
            InstanceConfig::new("https://staging.example.ch/geoserver", "admin", "secret")
                .insecure()
                .with_timeout_secs(10),
        );
        instances.save(&path).unwrap();

        let loaded = Instances::load(&path).unwrap();
        let staging = loaded.get("staging").unwrap();
        assert_eq!(staging.url, "https://staging.example.ch/geoserver");
        assert!(!staging.verify_tls);
        assert_eq!(staging.timeout_secs, 10);
    }

    #[test]
    fn defaults_applied_when_omitted() {
        let config: InstanceConfig = toml::from_str(
            "url = \"http://localhost\"\nuser = \"admin\"\npassword = \"pw\"\n",
        )
        .unwrap();
        assert!(config.verify_tls);
        assert_eq!(config.timeout_secs, 30);
    }
}
