//! Day-count aging against a fixed reference date.

use chrono::NaiveDate;

use crate::models::record::EventFields;

/// Whole days from `date` to `reference`. Future dates give negative values.
pub fn days_since(reference: NaiveDate, date: Option<NaiveDate>) -> Option<i64> {
    date.map(|d| (reference - d).num_days())
}

/// Photo and price aging for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aging {
    pub photo: Option<i64>,
    pub price: Option<i64>,
}

impl Aging {
    /// Compute aging of `fields` as of `reference`.
    pub fn of(fields: &EventFields, reference: NaiveDate) -> Self {
        Self {
            photo: days_since(reference, fields.updated_pictures),
            price: days_since(reference, fields.updated_price_date),
        }
    }
}
