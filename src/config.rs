//! Configuration for the board and its remote API client.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default remote API root.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
/// Default number of tasks per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Environment variable overriding [`BoardConfig::base_url`].
pub const ENV_BASE_URL: &str = "USERBOARD_BASE_URL";
/// Environment variable overriding [`BoardConfig::timeout_ms`].
pub const ENV_TIMEOUT_MS: &str = "USERBOARD_TIMEOUT_MS";
/// Environment variable overriding [`BoardConfig::page_size`].
pub const ENV_PAGE_SIZE: &str = "USERBOARD_PAGE_SIZE";

/// Configuration for a [`Board`](crate::Board).
///
/// # Example Configuration File
///
/// ```toml
/// base_url = "http://localhost:3000"
/// timeout_ms = 10000
/// page_size = 20
/// ```
///
/// # Examples
///
/// ```
/// use userboard::BoardConfig;
///
/// let config = BoardConfig::from_toml("page_size = 25").unwrap();
/// assert_eq!(config.page_size, 25);
/// assert_eq!(config.base_url, "https://jsonplaceholder.typicode.com");
/// assert_eq!(config.timeout_ms, 30_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Root URL of the remote REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Number of tasks per page in the tasks view.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30_000 // 30 seconds
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl BoardConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from `USERBOARD_*` environment variables on top of
    /// the defaults.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.parse::<u64>() {
                Ok(ms) => config.timeout_ms = ms,
                Err(_) => tracing::warn!(var = ENV_TIMEOUT_MS, value = %raw, "ignoring invalid timeout"),
            }
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            match raw.parse::<usize>() {
                Ok(size) if size > 0 => config.page_size = size,
                _ => tracing::warn!(var = ENV_PAGE_SIZE, value = %raw, "ignoring invalid page size"),
            }
        }

        config
    }

    /// Set the remote API root.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout in milliseconds.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Set the tasks page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parsed API root, normalised to end with `/` so relative endpoint
    /// paths join underneath it.
    pub fn api_root(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "base_url cannot be used as a base: {}",
                self.base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        self.api_root()?;
        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }
        Ok(())
    }

    /// Serialize the configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.page_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overrides() {
        let config = BoardConfig::from_toml(
            r#"
            base_url = "http://localhost:3000/api"
            timeout_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.page_size, 10);
        assert_eq!(
            config.api_root().unwrap().as_str(),
            "http://localhost:3000/api/"
        );
    }

    #[test]
    fn toml_round_trip() {
        let config = BoardConfig::new()
            .with_base_url("http://127.0.0.1:9000")
            .with_page_size(5);
        let parsed = BoardConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = BoardConfig::from_toml("page_size = 0").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn rejects_bad_url() {
        assert!(BoardConfig::new().with_base_url("::nope").validate().is_err());
        assert!(BoardConfig::new()
            .with_base_url("mailto:someone@example.com")
            .validate()
            .is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = BoardConfig::from_toml("page_size = ").unwrap_err();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn env_lookup_overrides_and_ignores_garbage() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://localhost:8080"),
            (ENV_TIMEOUT_MS, "not-a-number"),
            (ENV_PAGE_SIZE, "15"),
        ]
        .into_iter()
        .collect();
        let config = BoardConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.page_size, 15);
    }

    #[test]
    fn env_lookup_rejects_zero_page_size() {
        let config = BoardConfig::from_lookup(|key| (key == ENV_PAGE_SIZE).then(|| "0".to_string()));
        assert_eq!(config.page_size, 10);
    }
}
