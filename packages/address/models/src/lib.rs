#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for collection address verification.
//!
//! This crate contains only data types and simple conversions. It has no
//! heavyweight dependencies (no regex tables, no I/O), so the booking UI
//! layer and the geocoder client can share them with the verifier.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

/// A supported European country, identified by its ISO 3166-1 alpha-2
/// code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumCount,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CountryCode {
    /// Albania
    Al,
    /// Andorra
    Ad,
    /// Austria
    At,
    /// Belarus
    By,
    /// Belgium
    Be,
    /// Bosnia and Herzegovina
    Ba,
    /// Bulgaria
    Bg,
    /// Croatia
    Hr,
    /// Cyprus
    Cy,
    /// Czechia
    Cz,
    /// Denmark
    Dk,
    /// Estonia
    Ee,
    /// Finland
    Fi,
    /// France
    Fr,
    /// Germany
    De,
    /// Greece
    Gr,
    /// Hungary
    Hu,
    /// Iceland
    Is,
    /// Ireland
    Ie,
    /// Italy
    It,
    /// Kosovo
    Xk,
    /// Latvia
    Lv,
    /// Liechtenstein
    Li,
    /// Lithuania
    Lt,
    /// Luxembourg
    Lu,
    /// Malta
    Mt,
    /// Moldova
    Md,
    /// Monaco
    Mc,
    /// Montenegro
    Me,
    /// Netherlands
    Nl,
    /// North Macedonia
    Mk,
    /// Norway
    No,
    /// Poland
    Pl,
    /// Portugal
    Pt,
    /// Romania
    Ro,
    /// San Marino
    Sm,
    /// Serbia
    Rs,
    /// Slovakia
    Sk,
    /// Slovenia
    Si,
    /// Spain
    Es,
    /// Sweden
    Se,
    /// Switzerland
    Ch,
    /// Ukraine
    Ua,
    /// United Kingdom
    Gb,
    /// Vatican City
    Va,
}

impl CountryCode {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Al,
            Self::Ad,
            Self::At,
            Self::By,
            Self::Be,
            Self::Ba,
            Self::Bg,
            Self::Hr,
            Self::Cy,
            Self::Cz,
            Self::Dk,
            Self::Ee,
            Self::Fi,
            Self::Fr,
            Self::De,
            Self::Gr,
            Self::Hu,
            Self::Is,
            Self::Ie,
            Self::It,
            Self::Xk,
            Self::Lv,
            Self::Li,
            Self::Lt,
            Self::Lu,
            Self::Mt,
            Self::Md,
            Self::Mc,
            Self::Me,
            Self::Nl,
            Self::Mk,
            Self::No,
            Self::Pl,
            Self::Pt,
            Self::Ro,
            Self::Sm,
            Self::Rs,
            Self::Sk,
            Self::Si,
            Self::Es,
            Self::Se,
            Self::Ch,
            Self::Ua,
            Self::Gb,
            Self::Va,
        ]
    }

    /// English short name, used in diagnostics.
    #[must_use]
    pub const fn english_name(self) -> &'static str {
        match self {
            Self::Al => "Albania",
            Self::Ad => "Andorra",
            Self::At => "Austria",
            Self::By => "Belarus",
            Self::Be => "Belgium",
            Self::Ba => "Bosnia and Herzegovina",
            Self::Bg => "Bulgaria",
            Self::Hr => "Croatia",
            Self::Cy => "Cyprus",
            Self::Cz => "Czechia",
            Self::Dk => "Denmark",
            Self::Ee => "Estonia",
            Self::Fi => "Finland",
            Self::Fr => "France",
            Self::De => "Germany",
            Self::Gr => "Greece",
            Self::Hu => "Hungary",
            Self::Is => "Iceland",
            Self::Ie => "Ireland",
            Self::It => "Italy",
            Self::Xk => "Kosovo",
            Self::Lv => "Latvia",
            Self::Li => "Liechtenstein",
            Self::Lt => "Lithuania",
            Self::Lu => "Luxembourg",
            Self::Mt => "Malta",
            Self::Md => "Moldova",
            Self::Mc => "Monaco",
            Self::Me => "Montenegro",
            Self::Nl => "Netherlands",
            Self::Mk => "North Macedonia",
            Self::No => "Norway",
            Self::Pl => "Poland",
            Self::Pt => "Portugal",
            Self::Ro => "Romania",
            Self::Sm => "San Marino",
            Self::Rs => "Serbia",
            Self::Sk => "Slovakia",
            Self::Si => "Slovenia",
            Self::Es => "Spain",
            Self::Se => "Sweden",
            Self::Ch => "Switzerland",
            Self::Ua => "Ukraine",
            Self::Gb => "United Kingdom",
            Self::Va => "Vatican City",
        }
    }
}

/// A collection address exactly as the user typed it.
///
/// Every field is free text. Only `postcode` and `country` are needed for
/// verification to say anything meaningful; blank fields are treated as
/// "not entered yet" rather than as mismatches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInput {
    /// Street line, possibly including a house or unit number.
    pub street: String,
    /// City, town or village.
    pub city: String,
    /// County, state, region or province.
    pub county: String,
    /// Postal code.
    pub postcode: String,
    /// Country name or code in any language the user prefers.
    pub country: String,
}

/// One geocoder hit for a postcode query.
///
/// Mirrors the address-detail fields a Nominatim-compatible provider
/// returns. Unknown fields are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoCandidate {
    /// Comma-separated human-readable label for the place.
    pub display_name: String,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
    pub road: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub locality: Option<String>,
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    /// UK post town, when the provider reports one.
    pub post_town: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub region: Option<String>,
    pub province: Option<String>,
    pub postcode: Option<String>,
    /// Country name in whatever language the provider answered in.
    pub country_name: Option<String>,
    /// Lowercase ISO 3166-1 alpha-2 code, when the provider reports one.
    pub country_code: Option<String>,
}

impl GeoCandidate {
    /// City-like values, in the order they are most likely to be useful.
    ///
    /// Includes the first segment of the display name, which for postcode
    /// lookups is frequently the settlement the postcode is filed under.
    #[must_use]
    pub fn city_like(&self) -> Vec<&str> {
        let mut values: Vec<&str> = [
            &self.city,
            &self.town,
            &self.village,
            &self.municipality,
            &self.locality,
            &self.post_town,
        ]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .collect();

        if let Some(first) = self.display_name.split(',').next() {
            values.push(first);
        }

        values
            .into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// County-like values (`county`, `state`, `region`, `province`).
    #[must_use]
    pub fn county_like(&self) -> Vec<&str> {
        [&self.county, &self.state, &self.region, &self.province]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// The candidate's position.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// Which free-text field a plausibility check is judging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    /// Street line.
    Street,
    /// City, town or village.
    City,
    /// County, state, region or province.
    County,
}

/// The verdict for one address field.
///
/// Reasons are diagnostic strings for logs and developer tooling, not
/// copy for end users.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldVerdict {
    /// Plausible, or nothing to judge.
    #[default]
    Ok,
    /// Possibly wrong; shown as a hint, never blocks submission.
    Warning(String),
    /// Definitely wrong; blocks submission.
    Error(String),
}

impl FieldVerdict {
    /// Returns `true` for [`FieldVerdict::Error`].
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns `true` for [`FieldVerdict::Warning`].
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    /// Returns `true` for [`FieldVerdict::Ok`].
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The diagnostic reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::Warning(reason) | Self::Error(reason) => Some(reason),
        }
    }
}

/// Confidence tier of a street-name comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchConfidence {
    /// No meaningful words in common.
    NoMatch,
    /// Some overlap, but not enough to call it the same street.
    Low,
    /// Same street.
    Strong,
}

/// Outcome of a street-name comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetMatch {
    /// Confidence tier.
    pub confidence: MatchConfidence,
    /// Words matched exactly or by a long prefix.
    pub strong: u32,
    /// Words matched only by substring containment.
    pub weak: u32,
}

impl StreetMatch {
    /// A comparison that found nothing to compare.
    pub const NONE: Self = Self {
        confidence: MatchConfidence::NoMatch,
        strong: 0,
        weak: 0,
    };

    /// Returns `true` when the street is considered the same.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self.confidence, MatchConfidence::Strong)
    }

    /// Total number of matched words.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.strong + self.weak
    }
}

/// Per-field verdicts for one address, plus suggested coordinates.
///
/// `blocked` is derived from the verdicts at construction and is `true`
/// iff at least one of them is an [`FieldVerdict::Error`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub street: FieldVerdict,
    pub city: FieldVerdict,
    pub county: FieldVerdict,
    pub postcode: FieldVerdict,
    pub country: FieldVerdict,
    /// Position of the best candidate in the stated country.
    pub coordinates: Option<Coordinates>,
    /// Whether submission must be refused.
    pub blocked: bool,
}

impl VerificationResult {
    /// Assembles a result, deriving `blocked` from the verdicts.
    #[must_use]
    pub fn new(
        street: FieldVerdict,
        city: FieldVerdict,
        county: FieldVerdict,
        postcode: FieldVerdict,
        country: FieldVerdict,
        coordinates: Option<Coordinates>,
    ) -> Self {
        let blocked = [&street, &city, &county, &postcode, &country]
            .iter()
            .any(|v| v.is_error());

        Self {
            street,
            city,
            county,
            postcode,
            country,
            coordinates,
            blocked,
        }
    }

    /// A result with every field `Ok` and no coordinates.
    #[must_use]
    pub fn all_ok() -> Self {
        Self::new(
            FieldVerdict::Ok,
            FieldVerdict::Ok,
            FieldVerdict::Ok,
            FieldVerdict::Ok,
            FieldVerdict::Ok,
            None,
        )
    }

    /// Returns `true` if any field carries a warning.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.verdicts().iter().any(|(_, v)| v.is_warning())
    }

    /// Field name and verdict pairs in display order.
    #[must_use]
    pub fn verdicts(&self) -> [(&'static str, &FieldVerdict); 5] {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("county", &self.county),
            ("postcode", &self.postcode),
            ("country", &self.country),
        ]
    }
}
