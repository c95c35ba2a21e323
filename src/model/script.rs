//! Script and punctuation classification for OCR tokens.
//!
//! The "primary" script is the one being separated from the secondary
//! script on bilingual pages. Here it is Greek: a character counts as
//! primary when its code point falls in the Greek and Coptic block or in
//! the Greek Extended (polytonic) block.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex::Regex;

/// Code point ranges of the primary script.
pub const PRIMARY_SCRIPT_RANGES: [RangeInclusive<u32>; 2] = [0x0370..=0x03FF, 0x1F00..=0x1FFF];

/// Default share of primary-script characters a token needs.
pub const DEFAULT_PRIMARY_THRESHOLD: f64 = 0.5;

fn punctuation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\p{P}$").unwrap())
}

/// Check if a character belongs to the primary script.
pub fn is_primary_char(c: char) -> bool {
    let code = c as u32;
    PRIMARY_SCRIPT_RANGES
        .iter()
        .any(|range| range.contains(&code))
}

/// Check whether at least `threshold` of the characters of `text` are
/// primary-script. Every character counts toward the total, letters or not.
/// Empty text is never primary-script.
pub fn is_primary_script(text: &str, threshold: f64) -> bool {
    let total = text.chars().count();
    if total == 0 {
        return false;
    }

    let primary = text.chars().filter(|c| is_primary_char(*c)).count();
    primary as f64 / total as f64 >= threshold
}

/// Check whether `text` is a single punctuation character (Unicode category P*).
///
/// Multi-character tokens are never punctuation, even `...` or `;)`.
pub fn is_punctuation(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(_), None) => punctuation_regex().is_match(text),
        _ => false,
    }
}

/// Fraction (0.0 to 1.0) of `flags` that are true; 0.0 for an empty input.
pub fn primary_ratio<I>(flags: I) -> f64
where
    I: IntoIterator<Item = bool>,
{
    let (total, primary) = flags
        .into_iter()
        .fold((0usize, 0usize), |(total, primary), flag| {
            (total + 1, primary + usize::from(flag))
        });

    if total == 0 {
        0.0
    } else {
        primary as f64 / total as f64
    }
}

/// Percentage (0 to 100, rounded half to even) of `flags` that are true.
pub fn primary_percent<I>(flags: I) -> u32
where
    I: IntoIterator<Item = bool>,
{
    let percent = 100.0 * primary_ratio(flags);
    let floor = percent.floor();
    let rounded = if (percent - floor - 0.5).abs() < f64::EPSILON {
        if floor % 2.0 == 0.0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        percent.round()
    };
    rounded as u32
}
