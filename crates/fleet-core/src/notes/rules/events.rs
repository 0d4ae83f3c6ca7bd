//! Date-event and price-event matchers.

use regex::{Captures, Regex};
use tracing::trace;

use crate::error::{FleetError, Result};
use crate::models::config::SuppressionConfig;

use super::patterns::{date_event_pattern, price_event_pattern, suppression_pattern};
use super::{ExtractionMatch, FieldExtractor};

/// Discards matches that are followed closely by a marker token.
#[derive(Debug, Clone)]
pub struct Suppressor {
    pattern: Option<Regex>,
}

impl Suppressor {
    pub fn new(token: &str, window: usize) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(Self::disabled());
        }
        let pattern = suppression_pattern(token, window)
            .map_err(|e| FleetError::Config(format!("invalid suppression token: {}", e)))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn from_config(config: &SuppressionConfig) -> Result<Self> {
        Self::new(&config.token, config.window)
    }

    /// A suppressor that never discards anything.
    pub fn disabled() -> Self {
        Self { pattern: None }
    }

    /// Whether `following`, the text right after a match, starts the token
    /// within the window.
    pub fn is_suppressed(&self, following: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|re| re.is_match(following))
    }
}

impl Default for Suppressor {
    fn default() -> Self {
        let config = SuppressionConfig::default();
        Self {
            pattern: suppression_pattern(&config.token, config.window).ok(),
        }
    }
}

/// Leftmost non-suppressed captures at or after `start`.
///
/// A suppressed candidate is not retried in shorter form; the search moves
/// on to the next character after the candidate's start.
fn find_at<'t>(
    regex: &Regex,
    suppressor: &Suppressor,
    text: &'t str,
    mut start: usize,
) -> Option<Captures<'t>> {
    while start <= text.len() {
        let caps = regex.captures_at(text, start)?;
        let whole = caps.get(0)?;

        if !suppressor.is_suppressed(&text[whole.end()..]) {
            return Some(caps);
        }

        trace!("Suppressed match {:?} at {}", whole.as_str(), whole.start());
        start = whole.start()
            + text[whole.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }
    None
}

fn collect_all<T>(
    regex: &Regex,
    suppressor: &Suppressor,
    text: &str,
    mut build: impl FnMut(&Captures<'_>) -> Option<T>,
) -> Vec<ExtractionMatch<T>> {
    let mut results = Vec::new();
    let mut start = 0;

    while let Some(caps) = find_at(regex, suppressor, text, start) {
        let Some(whole) = caps.get(0) else { break };
        if let Some(value) = build(&caps) {
            results.push(
                ExtractionMatch::new(value, whole.as_str())
                    .with_position(whole.start(), whole.end()),
            );
        }
        start = whole.end().max(whole.start() + 1);
    }

    results
}

/// Finds `date - label` events and yields the raw date text.
#[derive(Debug, Clone)]
pub struct DateEventMatcher {
    regex: Regex,
    suppressor: Suppressor,
}

impl DateEventMatcher {
    pub fn new(labels: &[String], suppressor: Suppressor) -> Result<Self> {
        if labels.iter().all(|l| l.trim().is_empty()) {
            return Err(FleetError::Config("event rule has no labels".to_string()));
        }
        let regex = date_event_pattern(labels)
            .map_err(|e| FleetError::Config(format!("invalid date pattern: {}", e)))?;
        Ok(Self { regex, suppressor })
    }

    fn date_of(caps: &Captures<'_>) -> Option<String> {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }
}

impl FieldExtractor for DateEventMatcher {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = find_at(&self.regex, &self.suppressor, text, 0)?;
        let whole = caps.get(0)?;
        let date = Self::date_of(&caps)?;
        Some(ExtractionMatch::new(date, whole.as_str()).with_position(whole.start(), whole.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        collect_all(&self.regex, &self.suppressor, text, Self::date_of)
    }
}

/// Finds `date - label amount` events and yields the raw amount text.
#[derive(Debug, Clone)]
pub struct PriceEventMatcher {
    regex: Regex,
    suppressor: Suppressor,
}

impl PriceEventMatcher {
    pub fn new(labels: &[String], suppressor: Suppressor) -> Result<Self> {
        if labels.iter().all(|l| l.trim().is_empty()) {
            return Err(FleetError::Config("event rule has no labels".to_string()));
        }
        let regex = price_event_pattern(labels)
            .map_err(|e| FleetError::Config(format!("invalid price pattern: {}", e)))?;
        Ok(Self { regex, suppressor })
    }

    fn amount_of(caps: &Captures<'_>) -> Option<String> {
        caps.get(2).map(|m| m.as_str().to_string())
    }
}

impl FieldExtractor for PriceEventMatcher {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = find_at(&self.regex, &self.suppressor, text, 0)?;
        let whole = caps.get(0)?;
        let amount = Self::amount_of(&caps)?;
        Some(ExtractionMatch::new(amount, whole.as_str()).with_position(whole.start(), whole.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        collect_all(&self.regex, &self.suppressor, text, Self::amount_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_match_wins() {
        let matcher = DateEventMatcher::new(&labels(&["Updated Price"]), Suppressor::default()).unwrap();

        let note = "1/5/23 - Updated Price 12,500  2/9/23 - Updated Price 11,000";
        assert_eq!(matcher.extract(note).unwrap().value, "1/5/23");
    }

    #[test]
    fn test_suppressed_match_falls_through() {
        let matcher = DateEventMatcher::new(&labels(&["Listed"]), Suppressor::default()).unwrap();

        let note = "1/2/23 - Listed on FB  1/9/23 - Listed";
        let found = matcher.extract(note).unwrap();
        assert_eq!(found.value, "1/9/23");
        assert_eq!(found.position.map(|(s, _)| s), note.find("1/9/23"));
    }

    #[test]
    fn test_price_suppressed_entirely() {
        let matcher = PriceEventMatcher::new(&labels(&["Updated Price"]), Suppressor::default()).unwrap();

        assert!(matcher.extract("1/5/23 - Updated Price 12,500 FB post").is_none());
        assert_eq!(
            matcher.extract("1/5/23 - Updated Price 12,500 posted elsewhere FB").unwrap().value,
            "12,500"
        );
    }

    #[test]
    fn test_disabled_suppressor() {
        let matcher = PriceEventMatcher::new(&labels(&["Updated Price"]), Suppressor::disabled()).unwrap();
        assert!(matcher.extract("1/5/23 - Updated Price 12,500 FB").is_some());
    }

    #[test]
    fn test_extract_all() {
        let matcher = DateEventMatcher::new(&labels(&["Updated Photos"]), Suppressor::default()).unwrap();

        let note = "1/2/23 - Updated Photos  3/4/23 - Updated Photos FB  5/6/23 - Updated Photos";
        let dates: Vec<String> = matcher.extract_all(note).into_iter().map(|m| m.value).collect();
        assert_eq!(dates, vec!["1/2/23", "5/6/23"]);
    }

    #[test]
    fn test_empty_labels_rejected() {
        assert!(DateEventMatcher::new(&labels(&[" "]), Suppressor::default()).is_err());
    }
}
