//! Debounced, latest-request-wins verification.
//!
//! A form re-verifies the address while the user types. Each edit starts
//! a new request; only the newest request may decide whether the address
//! is blocked, and results that arrive for older requests are discarded
//! rather than applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use itad_address::{AddressInput, AddressVerifier, VerificationResult, postcode};

use crate::CandidateSource;

/// Identifies one request issued by a [`LatestRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Generation counter tracking the newest outstanding request.
#[derive(Debug, Default)]
pub struct LatestRequest {
    generation: AtomicU64,
}

impl LatestRequest {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
        }
    }

    /// Starts a new request, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns `true` if no request has begun since `ticket` was issued.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }
}

/// What a submitted verification request ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Candidates were fetched and the address was verified.
    Verified(VerificationResult),
    /// The candidate lookup failed. The address is not blocked.
    Skipped {
        /// Why the lookup failed.
        reason: String,
    },
    /// A newer request was submitted before this one finished.
    Superseded,
}

impl SessionOutcome {
    /// Whether the form may be submitted on the strength of this outcome.
    #[must_use]
    pub const fn allows_submission(&self) -> bool {
        match self {
            Self::Verified(result) => !result.blocked,
            Self::Skipped { .. } => true,
            Self::Superseded => false,
        }
    }

    /// The verification result, if the request got that far.
    #[must_use]
    pub const fn result(&self) -> Option<&VerificationResult> {
        match self {
            Self::Verified(result) => Some(result),
            Self::Skipped { .. } | Self::Superseded => None,
        }
    }
}

/// Verifies addresses against a [`CandidateSource`] as they are edited.
pub struct VerificationSession<S> {
    source: S,
    verifier: AddressVerifier,
    debounce: Duration,
    latest: LatestRequest,
}

impl<S: CandidateSource> VerificationSession<S> {
    #[must_use]
    pub const fn new(source: S, verifier: AddressVerifier, debounce: Duration) -> Self {
        Self {
            source,
            verifier,
            debounce,
            latest: LatestRequest::new(),
        }
    }

    /// The candidate source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Submits the current state of the address.
    ///
    /// Waits out the debounce period, fetches candidates for the postcode
    /// and verifies. Returns [`SessionOutcome::Superseded`] if another
    /// call to `submit` begins before this one completes.
    pub async fn submit(&self, address: &AddressInput) -> SessionOutcome {
        let ticket = self.latest.begin();

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }
        if !self.latest.is_current(ticket) {
            log::trace!("Request {ticket:?} superseded during debounce");
            return SessionOutcome::Superseded;
        }

        let country = Some(address.country.as_str()).filter(|c| !c.trim().is_empty());
        let candidates = if postcode::is_valid_postcode(&address.postcode, country) {
            match self.source.candidates(&address.postcode).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    log::warn!(
                        "Candidate lookup for {:?} failed, not blocking: {e}",
                        address.postcode
                    );
                    if !self.latest.is_current(ticket) {
                        return SessionOutcome::Superseded;
                    }
                    return SessionOutcome::Skipped {
                        reason: e.to_string(),
                    };
                }
            }
        } else {
            Vec::new()
        };

        if !self.latest.is_current(ticket) {
            log::debug!("Discarding stale result for request {ticket:?}");
            return SessionOutcome::Superseded;
        }

        SessionOutcome::Verified(self.verifier.verify(address, &candidates))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use itad_address::GeoCandidate;

    use super::*;
    use crate::GeocodeError;

    struct MockSource {
        candidates: Vec<GeoCandidate>,
        delay: Duration,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new(candidates: Vec<GeoCandidate>) -> Self {
            Self {
                candidates,
                delay: Duration::ZERO,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl CandidateSource for MockSource {
        async fn candidates(&self, _postcode: &str) -> Result<Vec<GeoCandidate>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(GeocodeError::RateLimited);
            }
            Ok(self.candidates.clone())
        }
    }

    fn finnish_candidate() -> GeoCandidate {
        GeoCandidate {
            display_name: "Tampere, Pirkanmaa, Finland".to_string(),
            lat: 61.4978,
            lng: 23.761,
            town: Some("Tampere".to_string()),
            state: Some("Pirkanmaa".to_string()),
            country_name: Some("Finland".to_string()),
            country_code: Some("fi".to_string()),
            ..GeoCandidate::default()
        }
    }

    fn french_address() -> AddressInput {
        AddressInput {
            city: "Beautheil-Saints".to_string(),
            postcode: "77120".to_string(),
            country: "France".to_string(),
            ..AddressInput::default()
        }
    }

    #[test]
    fn only_newest_ticket_is_current() {
        let latest = LatestRequest::new();
        let first = latest.begin();
        assert!(latest.is_current(first));

        let second = latest.begin();
        assert!(!latest.is_current(first));
        assert!(latest.is_current(second));
    }

    #[test]
    fn submission_rules() {
        assert!(SessionOutcome::Skipped {
            reason: "down".to_string()
        }
        .allows_submission());
        assert!(!SessionOutcome::Superseded.allows_submission());
        assert_eq!(SessionOutcome::Superseded.result(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn verifies_after_debounce() {
        let session = VerificationSession::new(
            MockSource::new(vec![finnish_candidate()]),
            AddressVerifier::default(),
            Duration::from_millis(400),
        );

        let outcome = session.submit(&french_address()).await;
        let result = outcome.result().unwrap();
        assert!(result.postcode.is_error());
        assert!(result.blocked);
        assert!(!outcome.allows_submission());
        assert_eq!(session.source().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_edit_supersedes_during_debounce() {
        let session = Arc::new(VerificationSession::new(
            MockSource::new(vec![finnish_candidate()]),
            AddressVerifier::default(),
            Duration::from_millis(400),
        ));

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit(&french_address()).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        let second = session.submit(&french_address()).await;

        assert_eq!(first.await.unwrap(), SessionOutcome::Superseded);
        assert!(matches!(second, SessionOutcome::Verified(_)));
        assert_eq!(session.source().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_fetch_result_is_discarded() {
        let mut source = MockSource::new(vec![finnish_candidate()]);
        source.delay = Duration::from_secs(2);
        let session = Arc::new(VerificationSession::new(
            source,
            AddressVerifier::default(),
            Duration::ZERO,
        ));

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit(&french_address()).await })
        };
        tokio::time::sleep(Duration::from_millis(500)).await;

        let second = session.submit(&french_address()).await;

        assert_eq!(first.await.unwrap(), SessionOutcome::Superseded);
        assert!(matches!(second, SessionOutcome::Verified(_)));
        assert_eq!(session.source().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_failure_fails_open() {
        let mut source = MockSource::new(Vec::new());
        source.fail = true;
        let session =
            VerificationSession::new(source, AddressVerifier::default(), Duration::ZERO);

        let outcome = session.submit(&french_address()).await;
        assert!(matches!(outcome, SessionOutcome::Skipped { .. }));
        assert!(outcome.allows_submission());
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_postcode_skips_lookup() {
        let session = VerificationSession::new(
            MockSource::new(vec![finnish_candidate()]),
            AddressVerifier::default(),
            Duration::ZERO,
        );
        let address = AddressInput {
            postcode: "ABC".to_string(),
            ..french_address()
        };

        let outcome = session.submit(&address).await;
        assert!(outcome.result().unwrap().postcode.is_error());
        assert_eq!(session.source().calls(), 0);
    }
}
