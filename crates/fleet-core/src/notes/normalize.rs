//! Conversion of raw event captures into typed fields.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::config::ExtractionConfig;
use crate::models::record::{EventFields, EventKind, EventMatch};

use super::rules::dates::DEFAULT_YEAR_PIVOT;
use super::rules::{parse_amount, parse_note_date};

/// Converts raw captures to dates and amounts, leniently.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    year_pivot: u32,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            year_pivot: DEFAULT_YEAR_PIVOT,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_year_pivot(config.two_digit_year_pivot)
    }

    /// Set the two-digit year pivot.
    pub fn with_year_pivot(mut self, pivot: u32) -> Self {
        self.year_pivot = pivot;
        self
    }

    /// Parse a raw date; unparseable text becomes `None`.
    pub fn date(&self, raw: Option<&str>) -> Option<NaiveDate> {
        let raw = raw?;
        let date = parse_note_date(raw, self.year_pivot);
        if date.is_none() {
            warn!("Ignoring unparseable note date {:?}", raw);
        }
        date
    }

    /// Parse a raw amount; unparseable text becomes `None`.
    pub fn amount(&self, raw: Option<&str>) -> Option<Decimal> {
        let raw = raw?;
        let amount = parse_amount(raw);
        if amount.is_none() {
            warn!("Ignoring unparseable note amount {:?}", raw);
        }
        amount
    }

    /// Build typed fields from one note's matches.
    pub fn normalize(&self, matches: &[EventMatch]) -> EventFields {
        let by_kind = |kind: EventKind| matches.iter().find(|m| m.kind == kind);
        let date_of = |kind: EventKind| self.date(by_kind(kind).and_then(|m| m.date.as_deref()));
        let amount_of =
            |kind: EventKind| self.amount(by_kind(kind).and_then(|m| m.amount.as_deref()));

        EventFields {
            updated_pictures: date_of(EventKind::PicturesUpdated)
                .or_else(|| date_of(EventKind::Listed)),
            inspection_uploaded: date_of(EventKind::InspectionUploaded),
            updated_price_date: date_of(EventKind::PriceUpdated),
            updated_price_amount: amount_of(EventKind::PriceUpdated),
            starting_date: date_of(EventKind::StartingPrice),
            starting_price: amount_of(EventKind::StartingPrice),
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
