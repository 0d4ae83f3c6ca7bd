//! Regex building blocks for inventory note events.

use lazy_static::lazy_static;
use regex::Regex;

/// Note date: 1-2 digit month and day, two-digit year, any of `-./`.
pub const DATE: &str = r"\d{1,2}[-./]\d{1,2}[-./]\d{2}";

/// Whole-dollar amount with thousands separators, or a plain digit run,
/// optionally with cents.
///
/// The grouped form comes first and plain runs of four or more digits are
/// tried before short ones, so a grouped amount is never cut at its first
/// comma.
pub const AMOUNT: &str =
    r"\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\d{4,}(?:\.\d{2})?|\d{1,3}(?:\.\d{2})?";

lazy_static! {
    // Standalone date, used when normalizing a captured date
    pub static ref DATE_PARTS: Regex = Regex::new(
        r"^\s*(\d{1,2})[-./](\d{1,2})[-./](\d{2})\s*$"
    ).unwrap();

    // Standalone amount, used when normalizing a captured amount
    pub static ref AMOUNT_PARTS: Regex = Regex::new(
        r"^\s*\$?\s*(\d[\d,]*(?:\.\d+)?)\s*$"
    ).unwrap();
}

/// Join label synonyms into a regex alternation of escaped literals.
///
/// Longer labels come first so that `Quick Listed` is preferred over
/// `Listed` at the same position.
pub fn label_alternation(labels: &[String]) -> String {
    let mut labels: Vec<&str> = labels
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();
    labels.sort_by(|a, b| b.len().cmp(&a.len()));

    labels
        .iter()
        .map(|l| regex::escape(l).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|")
}

/// Date-event pattern: the date and a label adjacent across a dash.
///
/// Accepts `date - label`, `date label -` and `label - date`. The date is
/// capture group 1 for the date-first forms and group 2 for the label-first
/// form. A date must end at a word boundary, so `1/5/2023` is not read as
/// `1/5/20`.
pub fn date_event_pattern(labels: &[String]) -> Result<Regex, regex::Error> {
    let alt = label_alternation(labels);
    Regex::new(&format!(
        r"(?i)({date})\b\s*(?:-\s*(?:{alt})|(?:{alt})\s*-)|(?:{alt})\s*-\s*({date})\b",
        date = DATE,
        alt = alt,
    ))
}

/// Price-event pattern: `date - label amount`, in that order.
///
/// Capture group 1 is the label, group 2 the amount. Trailing whitespace is
/// part of the match.
pub fn price_event_pattern(labels: &[String]) -> Result<Regex, regex::Error> {
    let alt = label_alternation(labels);
    Regex::new(&format!(
        r"(?i){date}\b\s*-\s*({alt})\s*\$?\s*({amount})\s*",
        date = DATE,
        alt = alt,
        amount = AMOUNT,
    ))
}

/// Pattern that detects the suppression token at the start of the text
/// following a match, within `window` characters and on the same line.
pub fn suppression_pattern(token: &str, window: usize) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\A.{{0,{}}}{}", window, regex::escape(token)))
}
