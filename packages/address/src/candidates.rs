//! Narrows geocoder candidates to the stated country.
//!
//! The same postcode string can be valid in several countries (`77120` is
//! both a French and a Finnish postcode), so candidates from other
//! countries must be removed before any field is compared.

use std::str::FromStr as _;

use crate::country::normalize_country;
use crate::{CountryCode, GeoCandidate};

/// Resolves the country a candidate belongs to.
///
/// Uses the reported country name first, then the ISO code.
#[must_use]
pub fn candidate_country(candidate: &GeoCandidate) -> Option<CountryCode> {
    candidate
        .country_name
        .as_deref()
        .and_then(normalize_country)
        .or_else(|| {
            candidate
                .country_code
                .as_deref()
                .and_then(|code| CountryCode::from_str(code.trim()).ok())
        })
}

/// Keeps only the candidates located in `target`, preserving order.
#[must_use]
pub fn filter_by_country(candidates: &[GeoCandidate], target: CountryCode) -> Vec<&GeoCandidate> {
    let filtered: Vec<&GeoCandidate> = candidates
        .iter()
        .filter(|c| candidate_country(c) == Some(target))
        .collect();

    log::debug!(
        "Kept {}/{} candidate(s) in {target}",
        filtered.len(),
        candidates.len()
    );

    filtered
}

/// Describes where the first candidate actually is, for diagnostics when
/// a postcode turns out to belong to another country.
///
/// Returns e.g. `"Finland, Pirkanmaa"`, or `None` when there are no
/// candidates or the first one carries no location names.
#[must_use]
pub fn sample_context(candidates: &[GeoCandidate]) -> Option<String> {
    let sample = candidates.first()?;

    let country = sample
        .country_name
        .clone()
        .or_else(|| candidate_country(sample).map(|c| c.english_name().to_string()));
    let county = sample.county_like().first().map(|s| (*s).to_string());

    let parts: Vec<String> = [country, county].into_iter().flatten().collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(country_name: Option<&str>, country_code: Option<&str>) -> GeoCandidate {
        GeoCandidate {
            country_name: country_name.map(String::from),
            country_code: country_code.map(String::from),
            ..GeoCandidate::default()
        }
    }

    #[test]
    fn resolves_by_name_then_code() {
        assert_eq!(
            candidate_country(&candidate(Some("Suomi / Finland"), None)),
            Some(CountryCode::Fi)
        );
        assert_eq!(
            candidate_country(&candidate(None, Some("fr"))),
            Some(CountryCode::Fr)
        );
        assert_eq!(
            candidate_country(&candidate(Some("Atlantis"), Some("de"))),
            Some(CountryCode::De)
        );
        assert_eq!(candidate_country(&candidate(None, None)), None);
    }

    #[test]
    fn keeps_only_target_country() {
        let candidates = vec![
            candidate(Some("Finland"), Some("fi")),
            candidate(Some("France"), Some("fr")),
            candidate(None, Some("FR")),
            candidate(None, None),
        ];

        let french = filter_by_country(&candidates, CountryCode::Fr);
        assert_eq!(french.len(), 2);
        assert!(french.iter().all(|c| candidate_country(c) == Some(CountryCode::Fr)));

        assert!(filter_by_country(&candidates, CountryCode::Gb).is_empty());
    }

    #[test]
    fn sample_context_names_country_and_county() {
        let candidates = vec![GeoCandidate {
            country_name: Some("Finland".to_string()),
            state: Some("Pirkanmaa".to_string()),
            ..GeoCandidate::default()
        }];
        assert_eq!(
            sample_context(&candidates).as_deref(),
            Some("Finland, Pirkanmaa")
        );

        let coded = vec![candidate(None, Some("fi"))];
        assert_eq!(sample_context(&coded).as_deref(), Some("Finland"));

        assert_eq!(sample_context(&[]), None);
        assert_eq!(sample_context(&[candidate(None, None)]), None);
    }
}
