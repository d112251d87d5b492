use crate::error::{RackzError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Which persistence backend the client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Snapshot,
    Remote,
}

impl Backend {
    fn as_str(&self) -> &'static str {
        match self {
            Backend::Snapshot => "snapshot",
            Backend::Remote => "remote",
        }
    }
}

/// Configuration for rackz, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RackzConfig {
    #[serde(default)]
    pub backend: Backend,

    /// Base URL of the realtime database (remote backend only)
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Access token appended to remote requests
    #[serde(default)]
    pub remote_auth: Option<String>,
}

impl Default for RackzConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            remote_url: None,
            remote_auth: None,
        }
    }
}

impl RackzConfig {
    pub const KEYS: [&'static str; 3] = ["backend", "remote-url", "remote-auth"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(RackzError::Io)?;
        let config: RackzConfig =
            serde_json::from_str(&content).map_err(RackzError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(RackzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(RackzError::Serialization)?;
        fs::write(config_path, content).map_err(RackzError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "backend" => Some(self.backend.as_str().to_string()),
            "remote-url" => Some(self.remote_url.clone().unwrap_or_default()),
            "remote-auth" => Some(if self.remote_auth.is_some() {
                "(set)".to_string()
            } else {
                String::new()
            }),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "backend" => {
                self.backend = match value {
                    "snapshot" => Backend::Snapshot,
                    "remote" => Backend::Remote,
                    other => {
                        return Err(format!(
                            "Invalid backend: {} (expected snapshot or remote)",
                            other
                        ))
                    }
                };
            }
            "remote-url" => self.remote_url = non_empty(value),
            "remote-auth" => self.remote_auth = non_empty(value),
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
