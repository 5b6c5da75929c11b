//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//! - `SENTRA_API_URL` - REST API base URL (default: `https://sentratamansari.com/api/v1`)
//! - `SENTRA_MEDIA_HOST` - Host that serves uploaded photos (default: `https://sentratamansari.com`)
//! - `SENTRA_SEARCH_DEBOUNCE_MS` - Quiet period before a live search fires (default: 300)

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://sentratamansari.com/api/v1";
pub const DEFAULT_MEDIA_HOST: &str = "https://sentratamansari.com";
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Settings shared by the client, the image resolver and the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub media_host: String,
    pub search_debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            media_host: DEFAULT_MEDIA_HOST.to_string(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidEnvVar` when a variable is set but
    /// unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup("SENTRA_API_URL")) {
            config.base_url = parse_http_url("SENTRA_API_URL", &url)?;
        }
        if let Some(host) = non_empty(lookup("SENTRA_MEDIA_HOST")) {
            config.media_host = parse_http_url("SENTRA_MEDIA_HOST", &host)?;
        }
        if let Some(ms) = non_empty(lookup("SENTRA_SEARCH_DEBOUNCE_MS")) {
            let ms: u64 = ms.parse().map_err(|_| {
                ConfigError::InvalidEnvVar(
                    "SENTRA_SEARCH_DEBOUNCE_MS".to_string(),
                    format!("expected milliseconds, got {ms:?}"),
                )
            })?;
            config.search_debounce = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_http_url(name: &str, value: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            format!("unsupported scheme {}", parsed.scheme()),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "https://sentratamansari.com/api/v1");
        assert_eq!(config.search_debounce, Duration::from_millis(300));
    }

    #[test]
    fn overrides_are_applied_and_trimmed() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SENTRA_API_URL", "http://localhost:8080/api/v1/"),
            ("SENTRA_MEDIA_HOST", "http://localhost:8080"),
            ("SENTRA_SEARCH_DEBOUNCE_MS", "150"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.media_host, "http://localhost:8080");
        assert_eq!(config.search_debounce, Duration::from_millis(150));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[("SENTRA_API_URL", "  ")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup(&[("SENTRA_SEARCH_DEBOUNCE_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("SENTRA_SEARCH_DEBOUNCE_MS"));

        assert!(ClientConfig::from_lookup(lookup(&[("SENTRA_API_URL", "ftp://host/api")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("SENTRA_API_URL", "not a url")])).is_err());
    }
}
