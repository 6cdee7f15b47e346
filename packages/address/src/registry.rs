#![allow(clippy::too_many_lines)]
//! Static country table: name variants and postcode formats.
//!
//! Every [`CountryCode`] has one postcode pattern, one example postcode and
//! at least one name variant. The lookups below are exhaustive `match`es,
//! so adding a country without registering it fails to compile.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::CountryCode;

/// Compiled postcode patterns, anchored and case-insensitive.
///
/// Compiled with Unicode mode off so that `\d`, `\s` and `[A-Z]` only
/// match ASCII.
static PATTERNS: LazyLock<BTreeMap<CountryCode, Regex>> = LazyLock::new(|| {
    CountryCode::all()
        .iter()
        .map(|&code| {
            let source = format!("(?i-u)^(?:{})$", pattern_source(code));
            (code, Regex::new(&source).expect("valid regex"))
        })
        .collect()
});

/// Returns the compiled postcode pattern for a country.
///
/// # Panics
///
/// Panics if `code` is missing from [`CountryCode::all`], which would be a
/// broken build rather than bad input.
#[must_use]
pub fn pattern(code: CountryCode) -> &'static Regex {
    PATTERNS
        .get(&code)
        .unwrap_or_else(|| panic!("country {code} is not registered in CountryCode::all()"))
}

/// Unanchored postcode pattern for a country, as written in the table.
#[must_use]
pub const fn pattern_source(code: CountryCode) -> &'static str {
    match code {
        CountryCode::Al
        | CountryCode::At
        | CountryCode::Be
        | CountryCode::Bg
        | CountryCode::Cy
        | CountryCode::Dk
        | CountryCode::Hu
        | CountryCode::Li
        | CountryCode::Mk
        | CountryCode::No
        | CountryCode::Ch => r"\d{4}",
        CountryCode::Ba
        | CountryCode::Hr
        | CountryCode::Ee
        | CountryCode::Fi
        | CountryCode::Fr
        | CountryCode::De
        | CountryCode::It
        | CountryCode::Xk
        | CountryCode::Me
        | CountryCode::Rs
        | CountryCode::Es
        | CountryCode::Ua => r"\d{5}",
        CountryCode::By | CountryCode::Ro => r"\d{6}",
        CountryCode::Cz | CountryCode::Gr | CountryCode::Sk | CountryCode::Se => r"\d{3}\s?\d{2}",
        CountryCode::Is => r"\d{3}",
        CountryCode::Ad => r"AD\s?\d{3}",
        CountryCode::Ie => r"[A-Z]\d{1,2}\s?[A-Z0-9]{4}",
        CountryCode::Lv => r"(?:LV-?)?\d{4}",
        CountryCode::Lt => r"(?:LT-?)?\d{5}",
        CountryCode::Lu => r"(?:L-?)?\d{4}",
        CountryCode::Mt => r"[A-Z]{3}\s?\d{4}",
        CountryCode::Md => r"(?:MD-?)?\d{4}",
        CountryCode::Mc => r"980\d{2}",
        CountryCode::Nl => r"\d{4}\s?[A-Z]{2}",
        CountryCode::Pl => r"\d{2}-?\d{3}",
        CountryCode::Pt => r"\d{4}-?\d{3}",
        CountryCode::Sm => r"4789\d",
        CountryCode::Si => r"(?:SI-?)?\d{4}",
        CountryCode::Gb => r"[A-Z]{1,2}\d{1,2}[A-Z]?\s?\d[A-Z]{2}",
        CountryCode::Va => r"00120",
    }
}

/// A real postcode in the country's format, for help text and tests.
#[must_use]
pub const fn example_postcode(code: CountryCode) -> &'static str {
    match code {
        CountryCode::Al => "1001",
        CountryCode::Ad => "AD500",
        CountryCode::At | CountryCode::Cy => "1010",
        CountryCode::By => "220030",
        CountryCode::Be | CountryCode::Bg | CountryCode::Mk | CountryCode::Si => "1000",
        CountryCode::Ba => "71000",
        CountryCode::Hr | CountryCode::Xk => "10000",
        CountryCode::Cz => "110 00",
        CountryCode::Dk => "1050",
        CountryCode::Ee => "10111",
        CountryCode::Fi => "00100",
        CountryCode::Fr => "75001",
        CountryCode::De => "10115",
        CountryCode::Gr => "105 57",
        CountryCode::Hu => "1051",
        CountryCode::Is => "101",
        CountryCode::Ie => "D02 X285",
        CountryCode::It => "00184",
        CountryCode::Lv => "LV-1050",
        CountryCode::Li => "9490",
        CountryCode::Lt => "LT-01100",
        CountryCode::Lu => "L-1009",
        CountryCode::Mt => "VLT 1117",
        CountryCode::Md => "MD-2001",
        CountryCode::Mc => "98000",
        CountryCode::Me => "81000",
        CountryCode::Nl => "1012 AB",
        CountryCode::No => "0150",
        CountryCode::Pl => "00-950",
        CountryCode::Pt => "1000-001",
        CountryCode::Ro => "010011",
        CountryCode::Sm => "47890",
        CountryCode::Rs => "11000",
        CountryCode::Sk => "811 01",
        CountryCode::Es => "28013",
        CountryCode::Se => "111 22",
        CountryCode::Ch => "8001",
        CountryCode::Ua => "01001",
        CountryCode::Gb => "SW1A 1AA",
        CountryCode::Va => "00120",
    }
}

/// Names a user or geocoder might give the country: English, native,
/// common abbreviations and the ISO alpha-2/alpha-3 codes.
///
/// Values are lowercase; accents are kept where the native spelling has
/// them and are folded away at lookup time.
#[must_use]
pub const fn name_variants(code: CountryCode) -> &'static [&'static str] {
    match code {
        CountryCode::Al => &["albania", "shqipëri", "shqipëria", "al", "alb"],
        CountryCode::Ad => &["andorra", "principality of andorra", "ad"],
        CountryCode::At => &["austria", "österreich", "republic of austria", "at", "aut"],
        CountryCode::By => &["belarus", "беларусь", "belarus'", "byelorussia", "by", "blr"],
        CountryCode::Be => &[
            "belgium",
            "belgië",
            "belgique",
            "belgien",
            "kingdom of belgium",
            "be",
            "bel",
        ],
        CountryCode::Ba => &[
            "bosnia and herzegovina",
            "bosnia & herzegovina",
            "bosnia",
            "bosna i hercegovina",
            "ba",
            "bih",
        ],
        CountryCode::Bg => &["bulgaria", "българия", "bg", "bgr"],
        CountryCode::Hr => &["croatia", "hrvatska", "republic of croatia", "hr", "hrv"],
        CountryCode::Cy => &["cyprus", "κύπρος", "kıbrıs", "cy", "cyp"],
        CountryCode::Cz => &[
            "czechia",
            "czech republic",
            "česko",
            "česká republika",
            "cz",
            "cze",
        ],
        CountryCode::Dk => &["denmark", "danmark", "kingdom of denmark", "dk", "dnk"],
        CountryCode::Ee => &["estonia", "eesti", "ee", "est"],
        CountryCode::Fi => &["finland", "suomi", "republic of finland", "fi", "fin"],
        CountryCode::Fr => &["france", "république française", "french republic", "fr", "fra"],
        CountryCode::De => &[
            "germany",
            "deutschland",
            "bundesrepublik deutschland",
            "federal republic of germany",
            "de",
            "deu",
            "ger",
        ],
        CountryCode::Gr => &["greece", "ελλάδα", "ellada", "hellas", "gr", "grc"],
        CountryCode::Hu => &["hungary", "magyarország", "hu", "hun"],
        CountryCode::Is => &["iceland", "ísland", "is", "isl"],
        CountryCode::Ie => &[
            "ireland",
            "éire",
            "republic of ireland",
            "roi",
            "ie",
            "irl",
        ],
        CountryCode::It => &["italy", "italia", "italian republic", "it", "ita"],
        CountryCode::Xk => &["kosovo", "kosova", "косово", "xk", "xkx"],
        CountryCode::Lv => &["latvia", "latvija", "lv", "lva"],
        CountryCode::Li => &["liechtenstein", "principality of liechtenstein", "li", "lie"],
        CountryCode::Lt => &["lithuania", "lietuva", "lt", "ltu"],
        CountryCode::Lu => &["luxembourg", "lëtzebuerg", "luxemburg", "lu", "lux"],
        CountryCode::Mt => &["malta", "republic of malta", "mt", "mlt"],
        CountryCode::Md => &["moldova", "republic of moldova", "moldavia", "md", "mda"],
        CountryCode::Mc => &["monaco", "principality of monaco", "mc", "mco"],
        CountryCode::Me => &["montenegro", "crna gora", "црна гора", "me", "mne"],
        CountryCode::Nl => &[
            "netherlands",
            "nederland",
            "holland",
            "kingdom of the netherlands",
            "nl",
            "nld",
        ],
        CountryCode::Mk => &[
            "north macedonia",
            "macedonia",
            "северна македонија",
            "fyrom",
            "mk",
            "mkd",
        ],
        CountryCode::No => &["norway", "norge", "noreg", "no", "nor"],
        CountryCode::Pl => &["poland", "polska", "republic of poland", "pl", "pol"],
        CountryCode::Pt => &["portugal", "portuguese republic", "pt", "prt"],
        CountryCode::Ro => &["romania", "românia", "roumania", "ro", "rou"],
        CountryCode::Sm => &["san marino", "republic of san marino", "sm", "smr"],
        CountryCode::Rs => &["serbia", "srbija", "србија", "rs", "srb"],
        CountryCode::Sk => &["slovakia", "slovensko", "slovak republic", "sk", "svk"],
        CountryCode::Si => &["slovenia", "slovenija", "si", "svn"],
        CountryCode::Es => &["spain", "españa", "espanya", "kingdom of spain", "es", "esp"],
        CountryCode::Se => &["sweden", "sverige", "kingdom of sweden", "se", "swe"],
        CountryCode::Ch => &[
            "switzerland",
            "schweiz",
            "suisse",
            "svizzera",
            "svizra",
            "swiss confederation",
            "ch",
            "che",
        ],
        CountryCode::Ua => &["ukraine", "україна", "ukraina", "ua", "ukr"],
        CountryCode::Gb => &[
            "united kingdom",
            "united kingdom of great britain and northern ireland",
            "great britain",
            "britain",
            "england",
            "scotland",
            "wales",
            "northern ireland",
            "uk",
            "u.k.",
            "gb",
            "gbr",
        ],
        CountryCode::Va => &[
            "vatican city",
            "vatican",
            "holy see",
            "città del vaticano",
            "vatican city state",
            "va",
            "vat",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::text::normalize_text;

    #[test]
    fn every_country_is_registered() {
        for &code in CountryCode::all() {
            assert!(!pattern_source(code).is_empty(), "{code} has no pattern");
            assert!(!name_variants(code).is_empty(), "{code} has no name variants");
            assert!(
                !example_postcode(code).is_empty(),
                "{code} has no example postcode"
            );
            // Forces compilation of every pattern.
            let _ = pattern(code);
        }
    }

    #[test]
    fn example_postcodes_match_their_own_pattern() {
        for &code in CountryCode::all() {
            let example = example_postcode(code);
            assert!(
                pattern(code).is_match(example),
                "example {example:?} does not match the {code} pattern"
            );
        }
    }

    #[test]
    fn variants_are_lowercase_and_include_iso_code() {
        for &code in CountryCode::all() {
            let variants = name_variants(code);
            let iso = code.as_ref().to_lowercase();
            assert!(variants.contains(&iso.as_str()), "{code} lacks its ISO code");
            for variant in variants {
                assert_eq!(*variant, variant.to_lowercase(), "{code}: {variant}");
            }
        }
    }

    #[test]
    fn folded_variants_are_unique_across_countries() {
        let mut seen: BTreeMap<String, CountryCode> = BTreeMap::new();
        for &code in CountryCode::all() {
            for variant in name_variants(code) {
                let folded = normalize_text(variant);
                if let Some(other) = seen.insert(folded.clone(), code) {
                    assert_eq!(other, code, "variant {folded:?} is shared by {other} and {code}");
                }
            }
        }
    }

    #[test]
    fn patterns_are_anchored() {
        assert!(!pattern(CountryCode::De).is_match("101150"));
        assert!(!pattern(CountryCode::De).is_match("x10115"));
        assert!(!pattern(CountryCode::Va).is_match("001200"));
    }

    #[test]
    fn patterns_accept_ascii_only() {
        // Arabic-Indic and fullwidth digits
        assert!(!pattern(CountryCode::De).is_match("\u{661}\u{660}\u{661}\u{661}\u{665}"));
        assert!(!pattern(CountryCode::De).is_match("\u{ff11}\u{ff10}\u{ff11}\u{ff11}\u{ff15}"));
        // Kelvin sign folds to "k" in Unicode mode
        assert!(!pattern(CountryCode::Gb).is_match("\u{212a}1 1AA"));
        assert!(!pattern(CountryCode::Cz).is_match("110\u{a0}00"));
        assert!(pattern(CountryCode::Gb).is_match("sw1a 1aa"));
    }
}
