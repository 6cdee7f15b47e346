//! Field-by-field address verification.
//!
//! Combines the country registry, postcode formats, candidate filtering
//! and fuzzy matching into one [`VerificationResult`]. Errors block
//! submission; warnings are hints. The checks run in a fixed order:
//!
//! 1. Postcode format (a hard prerequisite)
//! 2. Enough information to say anything (city or country entered)
//! 3. Country resolution and candidate filtering
//! 4. City, county, street and country comparison against the filtered
//!    candidates

use std::collections::BTreeSet;

use crate::candidates::{candidate_country, filter_by_country, sample_context};
use crate::country::normalize_country;
use crate::postcode::is_valid_postcode;
use crate::street::street_confidence;
use crate::text::{is_obviously_invalid, normalize_text, strict_match};
use crate::{
    AddressInput, CountryCode, FieldKind, FieldVerdict, GeoCandidate, MatchThresholds,
    VerificationResult,
};

/// Verifies addresses against geocoder candidates.
///
/// Stateless apart from its thresholds: the same input always produces
/// the same result, and one verifier can be shared between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressVerifier {
    thresholds: MatchThresholds,
}

/// Verifies an address with the default thresholds.
#[must_use]
pub fn verify_address(address: &AddressInput, candidates: &[GeoCandidate]) -> VerificationResult {
    AddressVerifier::default().verify(address, candidates)
}

/// Verdicts for the free-text fields that do not depend on candidates.
struct PlausibilityVerdicts {
    street: FieldVerdict,
    city: FieldVerdict,
    county: FieldVerdict,
}

impl AddressVerifier {
    /// Creates a verifier with custom thresholds.
    #[must_use]
    pub const fn new(thresholds: MatchThresholds) -> Self {
        Self { thresholds }
    }

    /// The thresholds in use.
    #[must_use]
    pub const fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    /// Verifies `address` against the candidates a geocoder returned for
    /// its postcode.
    ///
    /// Never fails: fields that cannot be judged are reported as
    /// [`FieldVerdict::Ok`] (no opinion).
    #[must_use]
    pub fn verify(&self, address: &AddressInput, candidates: &[GeoCandidate]) -> VerificationResult {
        let country_text = address.country.trim();
        let stated_country = (!country_text.is_empty()).then_some(country_text);

        if !is_valid_postcode(&address.postcode, stated_country) {
            log::debug!(
                "Postcode {:?} is malformed for country {:?}",
                address.postcode,
                address.country
            );
            return VerificationResult::new(
                FieldVerdict::Ok,
                FieldVerdict::Ok,
                FieldVerdict::Ok,
                FieldVerdict::Error(format!(
                    "postcode {:?} is not a valid format for {}",
                    address.postcode.trim(),
                    stated_country.unwrap_or("any supported country")
                )),
                FieldVerdict::Ok,
                None,
            );
        }

        if address.city.trim().is_empty() && stated_country.is_none() {
            log::debug!("Neither city nor country entered; nothing to verify yet");
            return VerificationResult::all_ok();
        }

        let plausibility = self.plausibility(address);

        let Some(target) = stated_country.and_then(normalize_country) else {
            log::debug!(
                "Country {:?} not recognized; skipping candidate comparison",
                address.country
            );
            return VerificationResult::new(
                plausibility.street,
                plausibility.city,
                plausibility.county,
                FieldVerdict::Ok,
                FieldVerdict::Ok,
                None,
            );
        };

        if candidates.is_empty() {
            log::debug!("Geocoder has no candidates for postcode {:?}", address.postcode);
            return VerificationResult::new(
                plausibility.street,
                plausibility.city,
                plausibility.county,
                FieldVerdict::Warning(format!(
                    "postcode {:?} not found",
                    address.postcode.trim()
                )),
                FieldVerdict::Ok,
                None,
            );
        }

        let filtered = filter_by_country(candidates, target);

        let Some(best) = filtered.first() else {
            let found_in = sample_context(candidates)
                .map(|context| format!("; found in {context}"))
                .unwrap_or_default();
            log::debug!(
                "Postcode {:?} exists, but not in {target}{found_in}",
                address.postcode
            );
            return VerificationResult::new(
                plausibility.street,
                plausibility.city,
                plausibility.county,
                FieldVerdict::Error(format!(
                    "postcode {:?} not found in {}{found_in}",
                    address.postcode.trim(),
                    target.english_name()
                )),
                FieldVerdict::Ok,
                None,
            );
        };

        let (county, county_matched) = self.county_verdict(address, &filtered, plausibility.county);
        let city = self.city_verdict(address, &filtered, plausibility.city, county_matched);
        let street = self.street_verdict(address, best, plausibility.street);
        let country = country_verdict(best, target);

        VerificationResult::new(
            street,
            city,
            county,
            FieldVerdict::Ok,
            country,
            Some(best.coordinates()),
        )
    }

    /// Checks each free-text field for values that cannot be a place name.
    fn plausibility(&self, address: &AddressInput) -> PlausibilityVerdicts {
        let invalid = |value: &str, kind: FieldKind| {
            !value.trim().is_empty() && is_obviously_invalid(value, kind, &self.thresholds)
        };

        PlausibilityVerdicts {
            street: if invalid(&address.street, FieldKind::Street) {
                FieldVerdict::Warning(format!(
                    "street {:?} is in an unusual format",
                    address.street.trim()
                ))
            } else {
                FieldVerdict::Ok
            },
            city: if invalid(&address.city, FieldKind::City) {
                FieldVerdict::Error(format!("city {:?} is not a place name", address.city.trim()))
            } else {
                FieldVerdict::Ok
            },
            county: if invalid(&address.county, FieldKind::County) {
                FieldVerdict::Error(format!(
                    "county {:?} is not a place name",
                    address.county.trim()
                ))
            } else {
                FieldVerdict::Ok
            },
        }
    }

    /// Returns the county verdict and whether the county corroborates the
    /// address (used to excuse a city mismatch).
    fn county_verdict(
        &self,
        address: &AddressInput,
        filtered: &[&GeoCandidate],
        plausibility: FieldVerdict,
    ) -> (FieldVerdict, bool) {
        let entered = address.county.trim();
        if entered.is_empty() {
            return (FieldVerdict::Ok, false);
        }
        if !plausibility.is_ok() {
            return (plausibility, false);
        }

        let known = distinct_values(filtered.iter().flat_map(|c| c.county_like()));
        if known.iter().any(|k| strict_match(entered, k, &self.thresholds)) {
            log::debug!("County {entered:?} matches candidates");
            (FieldVerdict::Ok, true)
        } else {
            log::debug!("County {entered:?} not among {known:?}");
            (
                FieldVerdict::Warning(format!(
                    "county {entered:?} does not match {}",
                    describe(&known)
                )),
                false,
            )
        }
    }

    fn city_verdict(
        &self,
        address: &AddressInput,
        filtered: &[&GeoCandidate],
        plausibility: FieldVerdict,
        county_matched: bool,
    ) -> FieldVerdict {
        let entered = address.city.trim();
        if entered.is_empty() {
            return FieldVerdict::Ok;
        }
        if !plausibility.is_ok() {
            return plausibility;
        }

        let known = distinct_values(filtered.iter().flat_map(|c| c.city_like()));
        if known.iter().any(|k| strict_match(entered, k, &self.thresholds)) {
            log::debug!("City {entered:?} matches candidates");
            return FieldVerdict::Ok;
        }

        // A postcode area can span several settlements; a matching county
        // is enough corroboration.
        if county_matched {
            log::debug!("City {entered:?} not among {known:?}, excused by county match");
            return FieldVerdict::Ok;
        }

        log::debug!("City {entered:?} not among {known:?}");
        FieldVerdict::Warning(format!(
            "city {entered:?} does not match {}",
            describe(&known)
        ))
    }

    fn street_verdict(
        &self,
        address: &AddressInput,
        best: &GeoCandidate,
        plausibility: FieldVerdict,
    ) -> FieldVerdict {
        let entered = address.street.trim();
        if entered.is_empty() {
            return FieldVerdict::Ok;
        }
        if !plausibility.is_ok() {
            return plausibility;
        }

        let road = best.road.as_deref().unwrap_or_default();
        let result = street_confidence(entered, road, &self.thresholds);
        log::debug!("Street {entered:?} vs road {road:?}: {result:?}");

        if result.is_match() {
            FieldVerdict::Ok
        } else if road.trim().is_empty() {
            FieldVerdict::Warning(format!(
                "street {entered:?} could not be checked; no road data for this postcode"
            ))
        } else {
            FieldVerdict::Warning(format!(
                "street {entered:?} does not match {road:?} ({} confidence)",
                result.confidence
            ))
        }
    }
}

/// Filtered candidates are already in the target country; this only
/// guards against a filter regression.
fn country_verdict(best: &GeoCandidate, target: CountryCode) -> FieldVerdict {
    match candidate_country(best) {
        Some(found) if found == target => FieldVerdict::Ok,
        found => {
            log::warn!("Filtered candidate is in {found:?}, expected {target}");
            FieldVerdict::Error(format!(
                "country mismatch: expected {}, candidate is in {}",
                target.english_name(),
                found.map_or("an unknown country", CountryCode::english_name)
            ))
        }
    }
}

/// Dedupes values by their normalized form, keeping the first spelling.
fn distinct_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    values
        .filter(|value| seen.insert(normalize_text(value)))
        .collect()
}

fn describe(known: &[&str]) -> String {
    if known.is_empty() {
        "anything the geocoder returned".to_string()
    } else {
        known.join(" / ")
    }
}
