#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address verification engine for collection bookings.
//!
//! Given a user-typed collection address and the candidates a geocoder
//! returned for its postcode, decides field by field whether the address
//! is plausible and supplies canonical coordinates.
//!
//! # Architecture
//!
//! - [`registry`]: static table of supported European countries, their
//!   name variants and postcode formats.
//! - [`country`]: maps free-text country input to a [`CountryCode`].
//! - [`postcode`]: postcode format checks, with a lenient any-country
//!   fallback when the country is unknown.
//! - [`candidates`]: narrows geocoder candidates to the stated country.
//! - [`text`] and [`street`]: normalization and fuzzy matching.
//! - [`verify`]: the orchestrator producing a [`VerificationResult`].
//!
//! The engine is pure and synchronous. It performs no I/O and holds no
//! mutable state, so a single [`AddressVerifier`] can be shared freely
//! between threads.
//!
//! # Usage
//!
//! ```rust
//! use itad_address::{AddressInput, GeoCandidate, verify_address};
//!
//! let address = AddressInput {
//!     street: "Unter den Linden 77".to_string(),
//!     city: "Berlin".to_string(),
//!     postcode: "10117".to_string(),
//!     country: "Germany".to_string(),
//!     ..AddressInput::default()
//! };
//! let candidates = vec![GeoCandidate {
//!     display_name: "Mitte, Berlin, 10117, Deutschland".to_string(),
//!     lat: 52.5163,
//!     lng: 13.3777,
//!     city: Some("Berlin".to_string()),
//!     country_name: Some("Deutschland".to_string()),
//!     ..GeoCandidate::default()
//! }];
//!
//! let result = verify_address(&address, &candidates);
//! assert!(!result.blocked);
//! ```

pub mod candidates;
pub mod config;
pub mod country;
pub mod postcode;
pub mod registry;
pub mod street;
pub mod text;
pub mod verify;

pub use config::MatchThresholds;
pub use itad_address_models::{
    AddressInput, Coordinates, CountryCode, FieldKind, FieldVerdict, GeoCandidate,
    MatchConfidence, StreetMatch, VerificationResult,
};
pub use verify::{AddressVerifier, verify_address};

/// Errors from loading verifier configuration.
///
/// Verification itself never fails: unusable input degrades to a verdict.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    /// Threshold file is not valid TOML or has mistyped values.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
