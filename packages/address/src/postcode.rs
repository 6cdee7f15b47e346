//! Postcode format validation.
//!
//! When the country is known only its own format is accepted. When it is
//! not, any registered format is accepted: refusing a booking because the
//! country field was spelled unusually is worse than letting an ambiguous
//! postcode through to the geocoder check.

use std::sync::LazyLock;

use regex::Regex;

use crate::CountryCode;
use crate::country::normalize_country;
use crate::registry;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Trims and collapses internal whitespace.
fn tidy(postcode: &str) -> String {
    WHITESPACE_RE.replace_all(postcode.trim(), " ").into_owned()
}

/// Returns `true` if `postcode` is well-formed for `code`.
#[must_use]
pub fn is_valid_for(postcode: &str, code: CountryCode) -> bool {
    let postcode = tidy(postcode);
    !postcode.is_empty() && registry::pattern(code).is_match(&postcode)
}

/// Returns every country whose format `postcode` fits.
#[must_use]
pub fn matching_countries(postcode: &str) -> Vec<CountryCode> {
    let postcode = tidy(postcode);
    if postcode.is_empty() {
        return Vec::new();
    }

    CountryCode::all()
        .iter()
        .copied()
        .filter(|&code| registry::pattern(code).is_match(&postcode))
        .collect()
}

/// Validates a postcode against the stated country's format.
///
/// If `country` is absent or not recognized, falls back to accepting the
/// postcode when it fits any registered format.
#[must_use]
pub fn is_valid_postcode(postcode: &str, country: Option<&str>) -> bool {
    if let Some(code) = country.and_then(normalize_country) {
        return is_valid_for(postcode, code);
    }

    let matches = matching_countries(postcode);
    log::debug!(
        "Country unknown; postcode {postcode:?} fits {} registered format(s)",
        matches.len()
    );
    !matches.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_example_postcode_is_valid_for_its_country() {
        for &code in CountryCode::all() {
            let example = registry::example_postcode(code);
            assert!(is_valid_for(example, code), "{code}: {example}");
            assert!(
                is_valid_postcode(example, Some(code.english_name())),
                "{code}: {example}"
            );
        }
    }

    #[test]
    fn uk_formats() {
        for postcode in ["SW1A 1AA", "sw1a1aa", "M1 1AE", "B33 8TH", "CR2 6XH", "DN55 1PT", "EC1A 1BB"] {
            assert!(is_valid_for(postcode, CountryCode::Gb), "{postcode}");
        }
        for postcode in ["SW1A", "12345", "SW1A 1A", "SW1A-1AA"] {
            assert!(!is_valid_for(postcode, CountryCode::Gb), "{postcode}");
        }
    }

    #[test]
    fn separator_formats() {
        assert!(is_valid_for("1012 AB", CountryCode::Nl));
        assert!(is_valid_for("1012ab", CountryCode::Nl));
        assert!(!is_valid_for("1012-AB", CountryCode::Nl));
        assert!(is_valid_for("1000-001", CountryCode::Pt));
        assert!(is_valid_for("1000001", CountryCode::Pt));
        assert!(is_valid_for("00-950", CountryCode::Pl));
        assert!(is_valid_for("00950", CountryCode::Pl));
        assert!(is_valid_for("D02 X285", CountryCode::Ie));
        assert!(is_valid_for("d02x285", CountryCode::Ie));
    }

    #[test]
    fn stated_country_is_strict() {
        assert!(is_valid_postcode("10115", Some("Germany")));
        assert!(!is_valid_postcode("1011", Some("Germany")));
        assert!(!is_valid_postcode("SW1A 1AA", Some("France")));
        assert!(!is_valid_postcode("", Some("France")));
    }

    #[test]
    fn unknown_country_is_lenient() {
        assert!(is_valid_postcode("77120", Some("Narnia")));
        assert!(is_valid_postcode("SW1A 1AA", None));
        assert!(!is_valid_postcode("not a postcode", None));
        assert!(!is_valid_postcode("   ", None));
    }

    #[test]
    fn collisions_are_reported() {
        let countries = matching_countries("77120");
        assert!(countries.contains(&CountryCode::Fr));
        assert!(countries.contains(&CountryCode::Fi));
        assert!(!countries.contains(&CountryCode::Gb));
    }

    #[test]
    fn non_ascii_digits_are_rejected() {
        assert!(!is_valid_for("\u{661}\u{660}\u{661}\u{661}\u{665}", CountryCode::De));
        assert!(!is_valid_postcode("\u{661}\u{660}\u{661}\u{661}\u{665}", None));
    }

    #[test]
    fn internal_whitespace_is_collapsed() {
        assert!(is_valid_for("  SW1A   1AA ", CountryCode::Gb));
    }
}
