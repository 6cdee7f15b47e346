//! Tunable thresholds for fuzzy matching.
//!
//! The defaults are embedded at compile time from `thresholds.toml`; a
//! deployment can override individual values from its own file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::AddressError;

/// Embedded default thresholds (compiled into the binary).
const DEFAULT_THRESHOLDS_TOML: &str = include_str!("../thresholds.toml");

/// Word-length and count thresholds used by the text matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// Shortest word that may match another by prefix.
    pub prefix_min_len: usize,
    /// Shortest word that may match another by substring containment.
    pub substring_min_len: usize,
    /// Street words shorter than this are not compared.
    pub street_min_word_len: usize,
    /// Strong word matches needed to accept a street name.
    pub street_strong_matches: u32,
    /// Shorter values are never a real place name.
    pub min_value_len: usize,
}

impl MatchThresholds {
    const FALLBACK: Self = Self {
        prefix_min_len: 4,
        substring_min_len: 3,
        street_min_word_len: 3,
        street_strong_matches: 2,
        min_value_len: 2,
    };

    /// Parses thresholds from a TOML string. Missing keys keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Config`] if the TOML is malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, AddressError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Loads thresholds from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AddressError> {
        let path = path.as_ref();
        log::debug!("Loading match thresholds from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

impl Default for MatchThresholds {
    fn default() -> Self {
        toml::from_str::<EmbeddedThresholds>(DEFAULT_THRESHOLDS_TOML)
            .map_or(Self::FALLBACK, |embedded| embedded.0)
    }
}

/// Wrapper so the embedded file is parsed against [`MatchThresholds::FALLBACK`]
/// rather than recursing into [`Default`].
struct EmbeddedThresholds(MatchThresholds);

impl<'de> Deserialize<'de> for EmbeddedThresholds {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            prefix_min_len: Option<usize>,
            substring_min_len: Option<usize>,
            street_min_word_len: Option<usize>,
            street_strong_matches: Option<u32>,
            min_value_len: Option<usize>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let fallback = MatchThresholds::FALLBACK;
        Ok(Self(MatchThresholds {
            prefix_min_len: raw.prefix_min_len.unwrap_or(fallback.prefix_min_len),
            substring_min_len: raw.substring_min_len.unwrap_or(fallback.substring_min_len),
            street_min_word_len: raw
                .street_min_word_len
                .unwrap_or(fallback.street_min_word_len),
            street_strong_matches: raw
                .street_strong_matches
                .unwrap_or(fallback.street_strong_matches),
            min_value_len: raw.min_value_len.unwrap_or(fallback.min_value_len),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_toml() {
        let thresholds = MatchThresholds::default();
        assert_eq!(thresholds, MatchThresholds::FALLBACK);
        assert!(thresholds.substring_min_len <= thresholds.prefix_min_len);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let thresholds = MatchThresholds::from_toml_str("prefix_min_len = 5\n").unwrap();
        assert_eq!(thresholds.prefix_min_len, 5);
        assert_eq!(thresholds.substring_min_len, 3);
        assert_eq!(thresholds.street_strong_matches, 2);
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = MatchThresholds::from_toml_str("prefix_min_len = \"four\"").unwrap_err();
        assert!(matches!(err, AddressError::Config(_)));
    }
}
