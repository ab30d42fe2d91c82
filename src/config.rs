//! # Provider Configuration
//!
//! This module defines `ProviderConfig`, the connection settings shared by
//! every resource: the Directus endpoint, the static access token and the
//! request timeout.
//!
//! ## Sources
//!
//! Configuration can be assembled from three places, later ones winning:
//!
//! 1.  **Code**: `ProviderConfig::new(endpoint, token)`.
//! 2.  **YAML**: `ProviderConfig::parse` / `ProviderConfig::load`, e.g.
//!
//!     ```yaml
//!     endpoint: https://cms.example.com
//!     token: s3cr3t
//!     timeout_secs: 10
//!     ```
//!
//! 3.  **Environment**: `DIRECTUS_ENDPOINT`, `DIRECTUS_TOKEN` and
//!     `DIRECTUS_TIMEOUT_SECS` via `apply_env_overrides`.
//!
//! `validate` is the gate between a configuration and a client: it rejects a
//! missing endpoint, an unparsable endpoint URL and a missing token before any
//! network activity happens.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{self, DEFAULT_TIMEOUT, ENV_ENDPOINT, ENV_TIMEOUT_SECS, ENV_TOKEN};
use crate::error::{Error, Result};

/// Connection settings for a Directus instance
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the Directus instance, e.g. `https://cms.example.com`.
    #[serde(default)]
    pub endpoint: String,
    /// Static token sent as `Authorization: Bearer <token>`.
    #[serde(default)]
    pub token: String,
    /// Per-request timeout, written in seconds (fractions allowed) as
    /// `timeout_secs`. `None` or zero uses the default (30s).
    #[serde(
        default,
        rename = "timeout_secs",
        with = "duration_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parse a configuration from a YAML document.
    ///
    /// The result is not validated; call [`ProviderConfig::validate`] once
    /// all sources have been applied.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config {
            message: format!("invalid provider configuration: {}", e),
        })
    }

    /// Load a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Build a validated configuration purely from environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load the default configuration file if it exists, then apply
    /// environment overrides and validate.
    pub fn load_default() -> Result<Self> {
        let path = defaults::default_config_path();
        let mut config = if path.is_file() {
            log::debug!("loading provider configuration from {}", path.display());
            Self::load(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Replace fields with the values of any non-empty environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(endpoint) = non_empty_env(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(token) = non_empty_env(ENV_TOKEN) {
            self.token = token;
        }
        if let Some(timeout) = non_empty_env(ENV_TIMEOUT_SECS) {
            let secs = timeout.parse::<u64>().map_err(|_| Error::Config {
                message: format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, timeout
                ),
            })?;
            self.timeout = Some(Duration::from_secs(secs));
        }
        Ok(())
    }

    /// Check the required parameters.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::Config {
                message: "endpoint is required".to_string(),
            });
        }

        let url = url::Url::parse(endpoint).map_err(|e| Error::Config {
            message: format!("invalid endpoint URL '{}': {}", endpoint, e),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::Config {
                message: format!("endpoint must use http or https, got '{}'", url.scheme()),
            });
        }

        if self.token.is_empty() {
            return Err(Error::Config {
                message: "token is required".to_string(),
            });
        }

        Ok(())
    }

    /// Endpoint without trailing slashes, ready to prefix request paths.
    pub fn base_url(&self) -> String {
        self.endpoint.trim().trim_end_matches('/').to_string()
    }

    /// Effective per-request timeout.
    pub fn timeout(&self) -> Duration {
        match self.timeout {
            Some(timeout) if !timeout.is_zero() => timeout,
            _ => DEFAULT_TIMEOUT,
        }
    }
}

/// `Option<Duration>` as a number of seconds.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
            .transpose()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
