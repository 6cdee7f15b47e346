//! Text normalization and fuzzy place-name matching.
//!
//! Provides a deterministic normalization applied symmetrically to what
//! the user typed and to what the geocoder returned, so that
//! "Beautheil-Saints", "beautheil saints" and "Beauthéil Saints" all
//! compare equal.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{FieldKind, MatchThresholds};

/// Runs of whitespace, hyphens and dashes, collapsed to one space.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-\u{2010}-\u{2015}]+").expect("valid regex"));

/// Numbered administrative areas and road numbers ("Sector 7",
/// "Route 66") are legitimate even though they are mostly digits.
static NUMBERED_AREA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:sector|zone|district|area|route|road|rd|street|st|avenue|ave|lane|ln|block|plot|unit)\s+\d+",
    )
    .expect("valid regex")
});

/// Single letter followed by digits ("A4", "D917"): a road classification
/// number, valid as a street.
static ROUTE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z]\d+$").expect("valid regex"));

/// Values people type when they have nothing to type.
static PLACEHOLDER_VALUES: &[&str] = &[
    "n/a", "na", "none", "unknown", "null", "test", "xxx", "asdf", "tbc", "tbd",
];

/// Words too common in place names to corroborate a match on their own.
static GENERIC_PLACE_WORDS: &[&str] = &[
    "saint", "sainte", "sankt", "santa", "santo", "san", "sant", "upon", "under", "near", "sur",
    "sous", "les", "bei", "bad", "north", "south", "east", "west", "upper", "lower",
    "great", "little", "nord", "sud", "nieder", "ober", "unter", "neue", "neuf", "nouvelle",
    "city", "town", "village",
];

/// Strength of a single word-to-word comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum WordMatch {
    /// One word contains the other.
    Weak,
    /// Equal, or one is a long prefix of the other.
    Strong,
}

/// Normalizes free text for comparison.
///
/// The pipeline:
/// 1. NFD decomposition, combining marks dropped (accents stripped)
/// 2. Lowercase
/// 3. Runs of whitespace and hyphens collapsed to a single space
/// 4. Trim
#[must_use]
pub fn normalize_text(input: &str) -> String {
    let folded: String = input.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let lower = folded.to_lowercase();
    SEPARATOR_RE.replace_all(&lower, " ").trim().to_string()
}

/// Compares two already-normalized words.
pub(crate) fn compare_words(a: &str, b: &str, thresholds: &MatchThresholds) -> Option<WordMatch> {
    if a == b {
        return Some(WordMatch::Strong);
    }

    let shorter = a.chars().count().min(b.chars().count());

    if shorter >= thresholds.prefix_min_len && (a.starts_with(b) || b.starts_with(a)) {
        return Some(WordMatch::Strong);
    }

    if shorter >= thresholds.substring_min_len && (a.contains(b) || b.contains(a)) {
        return Some(WordMatch::Weak);
    }

    None
}

fn is_significant(word: &str, thresholds: &MatchThresholds) -> bool {
    word.chars().count() >= thresholds.prefix_min_len && !GENERIC_PLACE_WORDS.contains(&word)
}

/// Word-boundary-aware fuzzy equality for city and county names.
///
/// Geocoders disagree on granularity (village, municipality, post town),
/// so this accepts, in order:
/// - equality after normalization
/// - one string being a long prefix of the other
/// - every entered word matching some candidate word
/// - the first entered word matching, for names of at most two words
/// - any single significant (long, non-generic) word matching
///
/// Empty inputs never match.
#[must_use]
pub fn strict_match(entered: &str, candidate: &str, thresholds: &MatchThresholds) -> bool {
    let entered = normalize_text(entered);
    let candidate = normalize_text(candidate);

    if entered.is_empty() || candidate.is_empty() {
        return false;
    }

    if entered == candidate {
        return true;
    }

    let shorter = entered.chars().count().min(candidate.chars().count());
    if shorter >= thresholds.prefix_min_len
        && (entered.starts_with(&candidate) || candidate.starts_with(&entered))
    {
        return true;
    }

    let entered_words: Vec<&str> = entered.split(' ').collect();
    let candidate_words: Vec<&str> = candidate.split(' ').collect();
    let matches_any = |word: &str| {
        candidate_words
            .iter()
            .any(|c| compare_words(word, c, thresholds).is_some())
    };

    if entered_words.iter().all(|w| matches_any(w)) {
        return true;
    }

    let first = entered_words[0];
    if entered_words.len() <= 2 && matches_any(first) {
        return true;
    }

    let matched = entered_words
        .iter()
        .filter(|w| is_significant(w, thresholds))
        .any(|w| {
            candidate_words
                .iter()
                .filter(|c| is_significant(c, thresholds))
                .any(|c| compare_words(w, c, thresholds).is_some())
        });

    log::trace!("strict_match({entered:?}, {candidate:?}) word fallback: {matched}");
    matched
}

/// Returns `true` if the value cannot be a real street, city or county
/// name, whatever the geocoder says.
///
/// A value is obviously invalid when it is shorter than
/// [`MatchThresholds::min_value_len`], is a placeholder such as "n/a", or
/// contains no letters at all. Numbered areas ("Sector 7") and, for
/// streets, road codes ("A4", "D917") are never invalid.
#[must_use]
pub fn is_obviously_invalid(value: &str, kind: FieldKind, thresholds: &MatchThresholds) -> bool {
    let trimmed = value.trim();

    if NUMBERED_AREA_RE.is_match(trimmed) {
        return false;
    }

    if kind == FieldKind::Street && ROUTE_CODE_RE.is_match(trimmed) {
        return false;
    }

    if trimmed.chars().count() < thresholds.min_value_len {
        return true;
    }

    if PLACEHOLDER_VALUES.contains(&normalize_text(trimmed).as_str()) {
        return true;
    }

    !trimmed.chars().any(char::is_alphabetic)
}
