//! Transport configuration.
//!
//! Values can be set in code or read from the environment:
//! - `REST_CORE_BASE_URL`: prefix joined onto relative endpoints.
//! - `REST_CORE_TIMEOUT_SECS`: whole-request timeout in seconds.
//! - `REST_CORE_BODY_LIMIT_BYTES`: largest response body read into memory.

use std::time::Duration;

use thiserror::Error;

pub const BASE_URL_VAR: &str = "REST_CORE_BASE_URL";
pub const TIMEOUT_VAR: &str = "REST_CORE_TIMEOUT_SECS";
pub const BODY_LIMIT_VAR: &str = "REST_CORE_BODY_LIMIT_BYTES";

/// Same as ureq's own default of 10 MiB.
pub const DEFAULT_BODY_LIMIT: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {TIMEOUT_VAR} value {value:?}: expected whole seconds")]
    InvalidTimeout { value: String },

    #[error("invalid {BODY_LIMIT_VAR} value {value:?}: expected a byte count")]
    InvalidBodyLimit { value: String },
}

/// Settings for `UreqTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub body_limit: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        if let Some(url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.base_url(url.trim());
        }
        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout { value: raw.clone() })?;
            config = config.timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(BODY_LIMIT_VAR).filter(|v| !v.trim().is_empty()) {
            let bytes: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBodyLimit { value: raw.clone() })?;
            config = config.body_limit(bytes);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_default() {
        let config = TransportConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TransportConfig::default());
    }

    #[test]
    fn reads_base_url_and_timeout() {
        let config = TransportConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "https://api.example.com/v3/"),
            (TIMEOUT_VAR, "15"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com/v3"));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn reads_body_limit() {
        let config = TransportConfig::from_lookup(lookup(&[(BODY_LIMIT_VAR, "1048576")])).unwrap();
        assert_eq!(config.body_limit, 1024 * 1024);
        assert_eq!(TransportConfig::new().body_limit, DEFAULT_BODY_LIMIT);
    }

    #[test]
    fn rejects_negative_body_limit() {
        let err = TransportConfig::from_lookup(lookup(&[(BODY_LIMIT_VAR, "-1")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBodyLimit {
                value: "-1".to_string()
            }
        );
    }

    #[test]
    fn blank_values_are_ignored() {
        let config =
            TransportConfig::from_lookup(lookup(&[(BASE_URL_VAR, "  "), (TIMEOUT_VAR, "")])).unwrap();
        assert_eq!(config, TransportConfig::default());
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err = TransportConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidTimeout {
                value: "soon".to_string()
            }
        );
    }
}
