//! Inventory record data models.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One inventory unit as read from the input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stock number, the unique key of the unit.
    pub stock_number: String,

    /// Whether the unit is shown on the public site.
    pub display_on_site: DisplayFlag,

    /// Free-text log of dated actions. Blank cells are `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Current listed price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_price: Option<ListPrice>,
}

impl Record {
    pub fn new(stock_number: impl Into<String>) -> Self {
        Self {
            stock_number: stock_number.into(),
            display_on_site: DisplayFlag::default(),
            notes: None,
            list_price: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        self
    }

    pub fn with_list_price(mut self, price: impl Into<ListPrice>) -> Self {
        self.list_price = Some(price.into());
        self
    }

    pub fn with_display(mut self, flag: DisplayFlag) -> Self {
        self.display_on_site = flag;
        self
    }
}

/// Display-on-site flag.
///
/// Inventory exports spell this column several ways. Recognized yes/no
/// spellings (`yes`, `y`, `1`, `false`, ...) are rewritten as `True` or
/// `False` in the report; anything else is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisplayFlag {
    Yes,
    No,
    #[default]
    Unset,
    Other(String),
}

impl DisplayFlag {
    /// Parse a flag cell leniently.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" => DisplayFlag::Unset,
            "true" | "yes" | "y" | "1" => DisplayFlag::Yes,
            "false" | "no" | "n" | "0" => DisplayFlag::No,
            _ => DisplayFlag::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for DisplayFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFlag::Yes => f.write_str("True"),
            DisplayFlag::No => f.write_str("False"),
            DisplayFlag::Unset => Ok(()),
            DisplayFlag::Other(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for DisplayFlag {
    fn from(s: String) -> Self {
        DisplayFlag::parse(&s)
    }
}

impl From<DisplayFlag> for String {
    fn from(flag: DisplayFlag) -> Self {
        flag.to_string()
    }
}

/// A list price cell: a parsed amount, or the raw text when it is not one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListPrice {
    Amount(Decimal),
    Unparsed(String),
}

impl From<Decimal> for ListPrice {
    fn from(value: Decimal) -> Self {
        ListPrice::Amount(value)
    }
}

impl fmt::Display for ListPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListPrice::Amount(value) => write!(f, "{}", value),
            ListPrice::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Kind of lifecycle event recognized in a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Photos were refreshed or verified.
    PicturesUpdated,
    /// The unit was (quick) listed.
    Listed,
    /// An inspection report was uploaded.
    InspectionUploaded,
    /// The asking price was changed.
    PriceUpdated,
    /// The initial asking price was set.
    StartingPrice,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PicturesUpdated => "pictures_updated",
            EventKind::Listed => "listed",
            EventKind::InspectionUploaded => "inspection_uploaded",
            EventKind::PriceUpdated => "price_updated",
            EventKind::StartingPrice => "starting_price",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw captures for one event kind found in one note.
///
/// The date and the amount of a kind are located by separate searches, so
/// either may be missing; at least one is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMatch {
    pub kind: EventKind,

    /// Raw date text, e.g. `1/2/23`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Raw amount text, e.g. `12,500`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

impl EventMatch {
    pub fn dated(kind: EventKind, date: impl Into<String>) -> Self {
        Self {
            kind,
            date: Some(date.into()),
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }
}

/// Typed fields derived from a note's matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    /// Latest photo update, or the listing date when no photo update is noted.
    pub updated_pictures: Option<NaiveDate>,
    pub inspection_uploaded: Option<NaiveDate>,
    pub updated_price_date: Option<NaiveDate>,
    pub updated_price_amount: Option<Decimal>,
    pub starting_date: Option<NaiveDate>,
    pub starting_price: Option<Decimal>,
}

impl EventFields {
    /// True when nothing was recognized.
    pub fn is_empty(&self) -> bool {
        *self == EventFields::default()
    }
}

/// A record with its normalized event fields and aging metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub record: Record,
    pub fields: EventFields,

    /// Days since `updated_pictures`. Negative for future dates.
    pub photo_aging: Option<i64>,

    /// Days since `updated_price_date`. Negative for future dates.
    pub price_aging: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_flag_parse() {
        assert_eq!(DisplayFlag::parse("True"), DisplayFlag::Yes);
        assert_eq!(DisplayFlag::parse(" no "), DisplayFlag::No);
        assert_eq!(DisplayFlag::parse(""), DisplayFlag::Unset);
        assert_eq!(
            DisplayFlag::parse("Pending"),
            DisplayFlag::Other("Pending".to_string())
        );
        assert_eq!(DisplayFlag::Yes.to_string(), "True");
    }

    #[test]
    fn test_display_flag_rendering() {
        assert_eq!(DisplayFlag::parse("y").to_string(), "True");
        assert_eq!(DisplayFlag::parse("0").to_string(), "False");
        assert_eq!(DisplayFlag::parse(" Pending ").to_string(), "Pending");
        assert_eq!(DisplayFlag::parse("").to_string(), "");
    }

    #[test]
    fn test_blank_notes_are_none() {
        let record = Record::new("A100").with_notes("   ");
        assert!(record.notes.is_none());
    }
}
