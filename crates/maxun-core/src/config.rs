//! Client configuration for the Maxun SDK
//!
//! Configuration comes from three places, later ones overriding earlier ones:
//! 1. `.maxun/config.toml` under a project directory
//! 2. `MAXUN_API_KEY` / `MAXUN_BASE_URL` environment variables
//! 3. Explicit builder calls (`with_base_url`, `with_timeout_secs`)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::{MaxunError, Result};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "MAXUN_API_KEY";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "MAXUN_BASE_URL";

/// Default SDK endpoint of a self-hosted backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/sdk";

/// Connection settings for the Maxun backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Static API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the SDK API (no trailing slash required)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    /// Create a configuration with the given API key and default endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Default request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Build configuration from the environment only
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides().validated()
    }

    /// Load `.maxun/config.toml` (if present), then apply environment overrides
    pub fn load_or_default(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".maxun/config.toml");

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| {
                MaxunError::Config(format!(
                    "Failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            Self::default()
        };

        config.with_env_overrides().validated()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(api_key) = env::var(API_KEY_ENV) {
            tracing::debug!("Using API key from {}", API_KEY_ENV);
            self.api_key = api_key;
        }
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            tracing::debug!("Using base URL from {}: {}", BASE_URL_ENV, base_url);
            self.base_url = base_url;
        }
        self
    }

    /// Reject configurations that cannot authenticate
    pub fn validated(self) -> Result<Self> {
        if self.api_key.trim().is_empty() {
            return Err(MaxunError::Config(format!(
                "No API key found. Set {} or add `api_key` to .maxun/config.toml",
                API_KEY_ENV
            )));
        }
        if self.base_url.trim().is_empty() {
            return Err(MaxunError::Config("Base URL must not be empty".to_string()));
        }
        Ok(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
