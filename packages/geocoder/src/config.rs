//! Geocoding service configuration.
//!
//! The default configuration is embedded at compile time from
//! `services/nominatim.toml`; deployments can load their own file to
//! point at a self-hosted instance.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::GeocodeError;

/// Embedded default service configuration.
const NOMINATIM_TOML: &str = include_str!("../services/nominatim.toml");

/// Connection and pacing settings for a Nominatim-compatible geocoder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeocoderConfig {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Search endpoint (e.g., `"https://nominatim.openstreetmap.org/search"`).
    pub base_url: String,
    /// Identifying `User-Agent` header; the public instance rejects
    /// anonymous clients.
    pub user_agent: String,
    /// Language for place names in responses.
    #[serde(default = "default_language")]
    pub accept_language: String,
    /// Maximum candidates per lookup.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Minimum delay between requests in milliseconds.
    #[serde(default)]
    pub rate_limit_ms: u64,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Quiet period after the last edit before a lookup is sent.
    #[serde(default)]
    pub debounce_ms: u64,
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_limit() -> u32 {
    10
}

const fn default_timeout() -> u64 {
    10_000
}

impl GeocoderConfig {
    /// Returns the embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (this is a compile-time
    /// guarantee since the file is embedded).
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml_str(NOMINATIM_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded nominatim.toml: {e}"))
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the TOML is malformed or a
    /// required key is missing.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, GeocodeError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Minimum spacing between requests.
    #[must_use]
    pub const fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Debounce period for verification sessions.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self::embedded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_toml() {
        let config = GeocoderConfig::embedded();
        assert_eq!(config.id, "nominatim");
        assert!(!config.name.is_empty());
        assert!(config.base_url.starts_with("https://"));
        assert!(!config.user_agent.is_empty());
        assert!(config.limit > 0);
        assert_eq!(config.rate_limit(), Duration::from_secs(1));
    }

    #[test]
    fn optional_keys_have_defaults() {
        let config = GeocoderConfig::from_toml_str(
            r#"
            id = "local"
            name = "Self-hosted Nominatim"
            base_url = "http://localhost:8080/search"
            user_agent = "test"
            "#,
        )
        .unwrap();
        assert_eq!(config.accept_language, "en");
        assert_eq!(config.limit, 10);
        assert_eq!(config.rate_limit(), Duration::ZERO);
        assert_eq!(config.debounce(), Duration::ZERO);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn missing_base_url_is_an_error() {
        let err = GeocoderConfig::from_toml_str("id = \"x\"\nname = \"x\"\nuser_agent = \"x\"")
            .unwrap_err();
        assert!(matches!(err, GeocodeError::Config(_)));
    }
}
