//! Confidence-scored street-name comparison.
//!
//! Street names are the least reliable thing a postcode lookup returns,
//! so this never produces a hard mismatch: it grades how much of the
//! entered name the candidate road corroborates.

use crate::text::{WordMatch, compare_words, normalize_text};
use crate::{MatchConfidence, MatchThresholds, StreetMatch};

/// Road-type words that say nothing about which road it is.
static ROAD_TYPE_TOKENS: &[&str] = &[
    "street", "st", "str", "road", "rd", "avenue", "ave", "av", "lane", "ln", "drive", "dr",
    "close", "cl", "way", "court", "ct", "place", "pl", "boulevard", "blvd", "crescent", "cres",
    "terrace", "ter", "grove", "gardens", "gdns", "square", "sq", "mews", "parade", "row", "walk",
    "highway", "hwy",
];

/// Splits a normalized street line into the words worth comparing.
///
/// Drops road-type tokens, house numbers and words shorter than
/// [`MatchThresholds::street_min_word_len`]. Punctuation at word edges
/// ("12,", "st.") is trimmed first.
fn meaningful_words<'a>(normalized: &'a str, thresholds: &MatchThresholds) -> Vec<&'a str> {
    normalized
        .split(' ')
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() >= thresholds.street_min_word_len)
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .filter(|w| !ROAD_TYPE_TOKENS.contains(w))
        .collect()
}

/// Grades how well an entered street line matches a candidate road name.
///
/// Each meaningful entered word counts as a strong match (equal, or a
/// long prefix) or a weak match (substring) against the candidate's
/// words. The street is accepted ([`MatchConfidence::Strong`]) only when
/// at least [`MatchThresholds::street_strong_matches`] words match
/// strongly. Any other overlap, including a single-word name like
/// "High Street" matching exactly, is [`MatchConfidence::Low`].
///
/// If either side has no meaningful words the result is
/// [`StreetMatch::NONE`]: ambiguous, so callers should warn rather than
/// accept.
#[must_use]
pub fn street_confidence(entered: &str, road: &str, thresholds: &MatchThresholds) -> StreetMatch {
    let entered = normalize_text(entered);
    let road = normalize_text(road);

    let entered_words = meaningful_words(&entered, thresholds);
    let road_words = meaningful_words(&road, thresholds);

    if entered_words.is_empty() || road_words.is_empty() {
        log::trace!("street_confidence({entered:?}, {road:?}): nothing to compare");
        return StreetMatch::NONE;
    }

    let mut strong = 0u32;
    let mut weak = 0u32;

    for word in &entered_words {
        let best = road_words
            .iter()
            .filter_map(|r| compare_words(word, r, thresholds))
            .max();

        match best {
            Some(WordMatch::Strong) => strong += 1,
            Some(WordMatch::Weak) => weak += 1,
            None => {}
        }
    }

    let confidence = if strong >= thresholds.street_strong_matches {
        MatchConfidence::Strong
    } else if strong + weak > 0 {
        MatchConfidence::Low
    } else {
        MatchConfidence::NoMatch
    };

    log::trace!(
        "street_confidence({entered:?}, {road:?}): {confidence} (strong={strong}, weak={weak})"
    );

    StreetMatch {
        confidence,
        strong,
        weak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> MatchThresholds {
        MatchThresholds::default()
    }

    #[test]
    fn identical_multi_word_street_is_strong() {
        let result = street_confidence("Rue de la Paix", "Rue De La Paix", &thresholds());
        assert_eq!(result.confidence, MatchConfidence::Strong);
        assert_eq!(result.strong, 2);
        assert!(result.is_match());
    }

    #[test]
    fn house_number_and_road_type_are_ignored() {
        let result = street_confidence("12 High St.", "High Street", &thresholds());
        assert_eq!(result.strong, 1);
        assert_eq!(result.weak, 0);

        let result = street_confidence("Flat 3, 221b Baker St", "Baker Street", &thresholds());
        assert_eq!(result.strong, 1);
        assert!(!result.is_match());
    }

    #[test]
    fn single_word_name_is_low_confidence() {
        let result = street_confidence("Baker Street", "Baker Street", &thresholds());
        assert_eq!(result.confidence, MatchConfidence::Low);
        assert_eq!(result.strong, 1);
        assert!(!result.is_match());

        let result = street_confidence("Kingsway", "Kingsway", &thresholds());
        assert_eq!(result.confidence, MatchConfidence::Low);
    }

    #[test]
    fn strong_match_count_is_configurable() {
        let strict = MatchThresholds {
            street_strong_matches: 3,
            ..MatchThresholds::default()
        };
        let result = street_confidence("Rue de la Paix", "Rue De La Paix", &strict);
        assert_eq!(result.strong, 2);
        assert_eq!(result.confidence, MatchConfidence::Low);

        let lenient = MatchThresholds {
            street_strong_matches: 1,
            ..MatchThresholds::default()
        };
        let result = street_confidence("Baker Street", "Baker Street", &lenient);
        assert_eq!(result.confidence, MatchConfidence::Strong);
    }

    #[test]
    fn one_shared_word_is_low_confidence() {
        let result = street_confidence("Queen Victoria Road", "Victoria Avenue", &thresholds());
        assert_eq!(result.confidence, MatchConfidence::Low);
        assert_eq!(result.score(), 1);
    }

    #[test]
    fn substring_only_is_weak() {
        let result = street_confidence("Wood Lane", "Hollywood Lane", &thresholds());
        assert_eq!(result.strong, 0);
        assert_eq!(result.weak, 1);
        assert_eq!(result.confidence, MatchConfidence::Low);
    }

    #[test]
    fn no_shared_words_is_no_match() {
        let result = street_confidence("Kingsway", "Rue de Rivoli", &thresholds());
        assert_eq!(result.confidence, MatchConfidence::NoMatch);
        assert_eq!(result.score(), 0);
    }

    #[test]
    fn nothing_meaningful_is_none() {
        assert_eq!(street_confidence("123", "High Street", &thresholds()), StreetMatch::NONE);
        assert_eq!(street_confidence("Main Road", "", &thresholds()), StreetMatch::NONE);
        assert_eq!(street_confidence("Road", "Road", &thresholds()), StreetMatch::NONE);
    }

    #[test]
    fn accents_do_not_matter() {
        let result = street_confidence("Calle Mayor", "Cállé Mayor", &thresholds());
        assert!(result.is_match());
    }
}
