//! Free-text country normalization.
//!
//! Maps whatever a user typed (or a geocoder returned) to a
//! [`CountryCode`]. An unrecognized country is a normal outcome meaning
//! "cannot verify", never an error.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::CountryCode;
use crate::registry;
use crate::text::normalize_text;

/// Every registered name variant, folded, mapped to its country.
static VARIANT_INDEX: LazyLock<BTreeMap<String, CountryCode>> = LazyLock::new(|| {
    CountryCode::all()
        .iter()
        .flat_map(|&code| {
            registry::name_variants(code)
                .iter()
                .map(move |variant| (normalize_text(variant), code))
        })
        .collect()
});

/// Resolves free-text country input to a [`CountryCode`].
///
/// Matching is case-, accent- and hyphen-insensitive and tolerates a
/// leading "the" ("The Netherlands"). Multilingual names as returned by
/// geocoders ("Suomi / Finland", "België / Belgique / Belgien") are tried
/// part by part when the whole string is not recognized.
///
/// Returns `None` when no variant matches.
#[must_use]
pub fn normalize_country(input: &str) -> Option<CountryCode> {
    let folded = normalize_text(input);
    if folded.is_empty() {
        return None;
    }

    let resolved = lookup(&folded).or_else(|| {
        folded
            .split(['/', ',', ';'])
            .map(str::trim)
            .filter(|part| !part.is_empty() && part.len() < folded.len())
            .find_map(lookup)
    });

    if resolved.is_none() {
        log::trace!("Unrecognized country {input:?}");
    }

    resolved
}

fn lookup(folded: &str) -> Option<CountryCode> {
    let stripped = folded.strip_prefix("the ").unwrap_or(folded);
    VARIANT_INDEX.get(stripped).copied()
}
