//! Evaluator configuration schema and loading.
//!
//! Loading runs in three stages:
//!
//! 1. Parse TOML (`from_toml_str` / `from_file`). Every field has a default,
//!    so an empty document is valid.
//! 2. Apply environment overrides (`with_env_overrides`).
//! 3. Validate (`validate`). `load` and `from_env` run all three.
//!
//! Example:
//! ```toml
//! [remote]
//! enabled = true
//! base_url = "http://model.internal:8000"
//! predict_path = "/predict"
//! timeout_ms = 4000
//!
//! [evaluation]
//! default_patient_age = 28
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use hdp_contracts::{
    error::{HdpError, HdpResult},
    vitals::DEFAULT_PATIENT_AGE,
};

/// Overrides `remote.base_url`.
pub const ENV_BASE_URL: &str = "HDP_API_BASE_URL";

/// Overrides `remote.timeout_ms`.
pub const ENV_TIMEOUT_MS: &str = "HDP_REMOTE_TIMEOUT_MS";

/// Where the scoring service is assumed to live when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const DEFAULT_PREDICT_PATH: &str = "/predict";

pub const DEFAULT_TIMEOUT_MS: u64 = 4_000;

/// Timeouts above this are rejected: a hanging service must not stall the
/// caller for long.
pub const MAX_TIMEOUT_MS: u64 = 30_000;

/// Remote scoring service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// When false the evaluator skips the remote step entirely.
    pub enabled: bool,
    pub base_url: String,
    pub predict_path: String,
    /// Bound on the whole request (connect + response), milliseconds.
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            predict_path: DEFAULT_PREDICT_PATH.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl RemoteConfig {
    /// Full URL of the predict endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.predict_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// True when the endpoint was never configured. In practice nothing
    /// listens there and evaluation falls through to the clinical model.
    pub fn is_default_endpoint(&self) -> bool {
        self.base_url.trim_end_matches('/') == DEFAULT_BASE_URL
    }
}

/// Settings for the local evaluation steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Age used when a snapshot carries none.
    pub default_patient_age: u32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            default_patient_age: DEFAULT_PATIENT_AGE,
        }
    }
}

/// The top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdpConfig {
    pub remote: RemoteConfig,
    pub evaluation: EvaluationConfig,
}

impl HdpConfig {
    /// Parse `s` as TOML. Does not apply overrides or validate.
    ///
    /// Returns `HdpError::ConfigError` if the TOML is malformed or has
    /// fields of the wrong type.
    pub fn from_toml_str(s: &str) -> HdpResult<Self> {
        toml::from_str(s).map_err(|e| HdpError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    /// Read and parse the file at `path`. Does not apply overrides or validate.
    pub fn from_file(path: &Path) -> HdpResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| HdpError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Defaults plus process environment, validated.
    pub fn from_env() -> HdpResult<Self> {
        let config = Self::default().with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// File (or defaults when `path` is `None`) plus process environment,
    /// validated.
    pub fn load(path: Option<&Path>) -> HdpResult<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides read through `lookup` (normally `std::env::var`).
    ///
    /// Empty values are ignored. A non-numeric timeout is a `ConfigError`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> HdpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            debug!(base_url = %url, "remote base URL overridden from environment");
            self.remote.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS).filter(|v| !v.trim().is_empty()) {
            self.remote.timeout_ms = raw.trim().parse().map_err(|e| HdpError::ConfigError {
                reason: format!("{} must be an integer number of milliseconds: {}", ENV_TIMEOUT_MS, e),
            })?;
        }

        Ok(self)
    }

    /// Check value ranges and URL shape.
    pub fn validate(&self) -> HdpResult<()> {
        let remote = &self.remote;

        let url = Url::parse(&remote.base_url).map_err(|e| HdpError::ConfigError {
            reason: format!("remote.base_url '{}' is not a valid URL: {}", remote.base_url, e),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(HdpError::ConfigError {
                reason: format!(
                    "remote.base_url '{}' must use http or https, got '{}'",
                    remote.base_url,
                    url.scheme()
                ),
            });
        }

        // The parser folds "http:///path" into a host named "path".
        let authority = remote
            .base_url
            .trim()
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or_default();
        let has_host = url.host_str().is_some_and(|host| !host.is_empty());
        if !has_host || authority.starts_with('/') {
            return Err(HdpError::ConfigError {
                reason: format!("remote.base_url '{}' has no host", remote.base_url),
            });
        }

        if remote.timeout_ms == 0 || remote.timeout_ms > MAX_TIMEOUT_MS {
            return Err(HdpError::ConfigError {
                reason: format!(
                    "remote.timeout_ms must be between 1 and {}, got {}",
                    MAX_TIMEOUT_MS, remote.timeout_ms
                ),
            });
        }

        Ok(())
    }
}
