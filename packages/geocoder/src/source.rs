//! Where verification candidates come from.

use std::sync::Arc;

use itad_address::GeoCandidate;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::{GeocodeError, GeocoderConfig, nominatim};

/// A provider of geocoder candidates for a postcode.
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    /// Fetches every known place filed under `postcode`, in any country.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the lookup fails.
    async fn candidates(&self, postcode: &str) -> Result<Vec<GeoCandidate>, GeocodeError>;
}

#[async_trait::async_trait]
impl<T: CandidateSource + ?Sized> CandidateSource for Arc<T> {
    async fn candidates(&self, postcode: &str) -> Result<Vec<GeoCandidate>, GeocodeError> {
        (**self).candidates(postcode).await
    }
}

/// Rate-limited Nominatim lookups.
///
/// Concurrent callers are serialized so that requests are spaced at least
/// `rate_limit_ms` apart.
pub struct NominatimSource {
    client: reqwest::Client,
    config: GeocoderConfig,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimSource {
    /// Builds a source with an HTTP client configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Builds a source around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: GeocoderConfig) -> Self {
        Self {
            client,
            config,
            last_request: Mutex::new(None),
        }
    }

    /// The service configuration.
    #[must_use]
    pub const fn config(&self) -> &GeocoderConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl CandidateSource for NominatimSource {
    async fn candidates(&self, postcode: &str) -> Result<Vec<GeoCandidate>, GeocodeError> {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.config.rate_limit();
            if Instant::now() < ready_at {
                log::trace!("Waiting for {} rate limit", self.config.id);
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
        drop(last);

        nominatim::search_postcode(&self.client, &self.config, postcode).await
    }
}
