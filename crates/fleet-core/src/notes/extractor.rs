//! Rule-driven event extraction from a single note.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::config::{ExtractionConfig, RuleConfig};
use crate::models::record::{EventKind, EventMatch};

use super::rules::{DateEventMatcher, ExtractionMatch, FieldExtractor, PriceEventMatcher, Suppressor};
use super::EventExtractor;

/// A rule compiled into matchers.
#[derive(Debug, Clone)]
struct CompiledRule {
    kind: EventKind,
    date: DateEventMatcher,
    amount: Option<PriceEventMatcher>,
    yields_to: Option<EventKind>,
}

impl CompiledRule {
    fn compile(rule: &RuleConfig, suppressor: &Suppressor) -> Result<Self> {
        let date = DateEventMatcher::new(&rule.labels, suppressor.clone())?;
        let amount = if rule.amount {
            Some(PriceEventMatcher::new(&rule.labels, suppressor.clone())?)
        } else {
            None
        };

        Ok(Self {
            kind: rule.kind,
            date,
            amount,
            yields_to: rule.yields_to,
        })
    }

    fn apply(&self, note: &str) -> Option<EventMatch> {
        let date = self.date.extract(note).map(|m| m.value);
        let amount = self
            .amount
            .as_ref()
            .and_then(|matcher| matcher.extract(note))
            .map(|m| m.value);

        if date.is_none() && amount.is_none() {
            return None;
        }

        Some(EventMatch {
            kind: self.kind,
            date,
            amount,
        })
    }
}

/// One place in a note where a rule matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub kind: EventKind,
    /// True when `found.value` is an amount rather than a date.
    pub amount: bool,
    #[serde(flatten)]
    pub found: ExtractionMatch<String>,
}

/// Extracts lifecycle events from inventory notes.
#[derive(Debug, Clone)]
pub struct NoteExtractor {
    rules: Vec<CompiledRule>,
}

impl NoteExtractor {
    /// Compile the extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let suppressor = Suppressor::from_config(&config.suppression)?;
        let rules = config
            .rules
            .iter()
            .map(|rule| CompiledRule::compile(rule, &suppressor))
            .collect::<Result<Vec<_>>>()?;

        debug!("Compiled {} note rules", rules.len());
        Ok(Self { rules })
    }

    /// Every non-suppressed match of every rule, in note order.
    ///
    /// Unlike [`EventExtractor::extract`] this keeps repeated and superseded
    /// events.
    pub fn occurrences(&self, note: &str) -> Vec<Occurrence> {
        let mut all = Vec::new();
        for rule in &self.rules {
            all.extend(rule.date.extract_all(note).into_iter().map(|found| Occurrence {
                kind: rule.kind,
                amount: false,
                found,
            }));
            if let Some(matcher) = &rule.amount {
                all.extend(matcher.extract_all(note).into_iter().map(|found| Occurrence {
                    kind: rule.kind,
                    amount: true,
                    found,
                }));
            }
        }
        all.sort_by_key(|o| o.found.position.map_or(usize::MAX, |(start, _)| start));
        all
    }
}

impl Default for NoteExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
            .expect("default note rules are valid")
    }
}

impl EventExtractor for NoteExtractor {
    fn extract(&self, note: &str) -> Vec<EventMatch> {
        if note.trim().is_empty() {
            return Vec::new();
        }

        // First rule of each kind wins
        let mut found: Vec<EventMatch> = Vec::new();
        for rule in &self.rules {
            if found.iter().any(|m| m.kind == rule.kind) {
                continue;
            }
            if let Some(event) = rule.apply(note) {
                found.push(event);
            }
        }

        // Drop matches whose rule yields to a kind that also matched
        let kept: Vec<EventMatch> = found
            .iter()
            .filter(|m| {
                let yields_to = self
                    .rules
                    .iter()
                    .find(|r| r.kind == m.kind)
                    .and_then(|r| r.yields_to);
                match yields_to {
                    Some(winner) => !found.iter().any(|other| other.kind == winner),
                    None => true,
                }
            })
            .cloned()
            .collect();

        if kept.len() < found.len() {
            debug!("Dropped {} superseded matches", found.len() - kept.len());
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn find(matches: &[EventMatch], kind: EventKind) -> Option<&EventMatch> {
        matches.iter().find(|m| m.kind == kind)
    }

    #[test]
    fn test_empty_note() {
        let extractor = NoteExtractor::default();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   \n ").is_empty());
    }

    #[test]
    fn test_listed_fallback() {
        let extractor = NoteExtractor::default();

        let matches = extractor.extract("1/2/23 - Listed");
        assert_eq!(matches, vec![EventMatch::dated(EventKind::Listed, "1/2/23")]);
    }

    #[test]
    fn test_pictures_take_precedence_over_listed() {
        let extractor = NoteExtractor::default();

        let matches = extractor.extract("1/2/23 - Listed  2/14/23 - Photos Verified");
        assert_eq!(
            matches,
            vec![EventMatch::dated(EventKind::PicturesUpdated, "2/14/23")]
        );
    }

    #[test]
    fn test_independent_kinds() {
        let extractor = NoteExtractor::default();
        let note = "12/1/22 - Starting Price 21,000  1/5/23 - Updated Price 19,500  \
                    1/6/23 - Inspection Uploaded  1/7/23 - Quick Listed";

        let matches = extractor.extract(note);
        assert_eq!(matches.len(), 4);
        assert_eq!(
            find(&matches, EventKind::StartingPrice),
            Some(&EventMatch::dated(EventKind::StartingPrice, "12/1/22").with_amount("21,000"))
        );
        assert_eq!(
            find(&matches, EventKind::PriceUpdated),
            Some(&EventMatch::dated(EventKind::PriceUpdated, "1/5/23").with_amount("19,500"))
        );
        assert_eq!(
            find(&matches, EventKind::InspectionUploaded).and_then(|m| m.date.as_deref()),
            Some("1/6/23")
        );
        assert_eq!(
            find(&matches, EventKind::Listed).and_then(|m| m.date.as_deref()),
            Some("1/7/23")
        );
    }

    #[test]
    fn test_fb_suppresses_amount_only() {
        let extractor = NoteExtractor::default();

        // The date window ends at the label, the amount window after the amount
        let matches = extractor.extract("1/5/23 - Updated Price 12,500 on FB");
        let price = find(&matches, EventKind::PriceUpdated).unwrap();
        assert_eq!(price.date.as_deref(), Some("1/5/23"));
        assert_eq!(price.amount, None);

        let matches = extractor.extract("1/5/23 - Updated Price 12,500");
        let price = find(&matches, EventKind::PriceUpdated).unwrap();
        assert_eq!(price.amount.as_deref(), Some("12,500"));
    }

    #[test]
    fn test_four_digit_year_is_not_a_date() {
        let extractor = NoteExtractor::default();

        assert!(extractor.extract("Inspection Uploaded - 1/5/2023").is_empty());
        assert_eq!(
            extractor.extract("Inspection Uploaded - 1/5/23"),
            vec![EventMatch::dated(EventKind::InspectionUploaded, "1/5/23")]
        );
    }

    #[test]
    fn test_grouped_amount_followed_by_letters() {
        let extractor = NoteExtractor::default();

        let matches = extractor.extract("1/5/23 - Updated Price 12,500obo");
        let price = find(&matches, EventKind::PriceUpdated).unwrap();
        assert_eq!(price.amount.as_deref(), Some("12,500"));
    }

    #[test]
    fn test_occurrences_keep_repeats() {
        let extractor = NoteExtractor::default();
        let note = "1/2/23 - Listed  1/5/23 - Updated Price 12,500  2/1/23 - Updated Price 11,000 posted FB";

        let occurrences = extractor.occurrences(note);
        let found: Vec<(EventKind, bool, &str)> = occurrences
            .iter()
            .map(|o| (o.kind, o.amount, o.found.value.as_str()))
            .collect();
        assert_eq!(occurrences[0].found.source, "1/2/23 - Listed");
        assert_eq!(
            found,
            vec![
                (EventKind::Listed, false, "1/2/23"),
                (EventKind::PriceUpdated, false, "1/5/23"),
                (EventKind::PriceUpdated, true, "12,500"),
                (EventKind::PriceUpdated, false, "2/1/23"),
            ]
        );
    }

    #[test]
    fn test_custom_rules() {
        let mut config = ExtractionConfig::default();
        config.rules.insert(0, RuleConfig::new(EventKind::PicturesUpdated, &["New Pics"]));
        config.suppression.token = String::new();

        let extractor = NoteExtractor::from_config(&config).unwrap();
        let matches = extractor.extract("3/3/23 - new pics FB");
        assert_eq!(
            find(&matches, EventKind::PicturesUpdated).and_then(|m| m.date.as_deref()),
            Some("3/3/23")
        );
    }
}
