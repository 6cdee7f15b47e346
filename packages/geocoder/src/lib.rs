#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoder candidate lookup for collection address verification.
//!
//! The verification engine in [`itad_address`] is pure: it compares an
//! address against candidates it is handed. This crate is the caller side
//! that fetches those candidates and schedules verification while a user
//! is still typing:
//!
//! - [`nominatim`]: postcode lookups against a Nominatim-compatible
//!   provider and parsing of its `jsonv2` responses.
//! - [`source`]: the [`CandidateSource`] seam, with a rate-limited
//!   Nominatim implementation.
//! - [`session`]: debounced, "latest request wins" verification with
//!   fail-open handling of lookup failures.
//!
//! Configuration is loaded from the embedded `services/nominatim.toml`
//! (see [`config`]).

pub mod config;
pub mod nominatim;
pub mod session;
pub mod source;

use thiserror::Error;

pub use config::GeocoderConfig;
pub use session::{LatestRequest, SessionOutcome, Ticket, VerificationSession};
pub use source::{CandidateSource, NominatimSource};

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Service configuration is malformed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
