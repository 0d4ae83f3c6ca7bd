//! Report assembly: enrichment, column layout and ordering.

use std::cmp::Ordering;
use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::aging::Aging;
use crate::error::Result;
use crate::models::config::FleetConfig;
use crate::models::record::{DisplayFlag, EnrichedRecord, ListPrice, Record};
use crate::notes::{EventExtractor, NoteExtractor, Normalizer};

/// Output columns, in order.
pub const COLUMNS: [&str; 11] = [
    "StockNumber",
    "DisplayOnSite",
    "StartingDate",
    "StartingPrice",
    "UpdatedPriceDate",
    "UpdatedPriceAmount",
    "CurrentPrice",
    "PriceAging",
    "UpdatedPictures",
    "PhotoAging",
    "InspectionUploaded",
];

/// One output row. Field order matches [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportRow {
    pub stock_number: String,
    pub display_on_site: DisplayFlag,
    pub starting_date: Option<NaiveDate>,
    pub starting_price: Option<Decimal>,
    pub updated_price_date: Option<NaiveDate>,
    pub updated_price_amount: Option<Decimal>,
    pub current_price: Option<ListPrice>,
    pub price_aging: Option<i64>,
    pub updated_pictures: Option<NaiveDate>,
    pub photo_aging: Option<i64>,
    pub inspection_uploaded: Option<NaiveDate>,
}

impl From<&EnrichedRecord> for ReportRow {
    fn from(enriched: &EnrichedRecord) -> Self {
        let fields = &enriched.fields;
        Self {
            stock_number: enriched.record.stock_number.clone(),
            display_on_site: enriched.record.display_on_site.clone(),
            starting_date: fields.starting_date,
            starting_price: fields.starting_price,
            updated_price_date: fields.updated_price_date,
            updated_price_amount: fields.updated_price_amount,
            current_price: enriched.record.list_price.clone(),
            price_aging: enriched.price_aging,
            updated_pictures: fields.updated_pictures,
            photo_aging: enriched.photo_aging,
            inspection_uploaded: fields.inspection_uploaded,
        }
    }
}

impl ReportRow {
    /// Cell values in column order; `None` renders empty.
    pub fn cells(&self) -> [String; 11] {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(|v| v.to_string()).unwrap_or_default()
        }

        [
            self.stock_number.clone(),
            self.display_on_site.to_string(),
            opt(&self.starting_date),
            opt(&self.starting_price),
            opt(&self.updated_price_date),
            opt(&self.updated_price_amount),
            opt(&self.current_price),
            opt(&self.price_aging),
            opt(&self.updated_pictures),
            opt(&self.photo_aging),
            opt(&self.inspection_uploaded),
        ]
    }
}

/// Ascending, `None` after every value.
fn asc_nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending, `None` after every value.
fn desc_nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        _ => asc_nulls_last(a, b),
    }
}

/// Report ordering: starting date ascending, then photo aging descending,
/// then price aging descending. Missing values sort last for every key.
pub fn report_order(a: &EnrichedRecord, b: &EnrichedRecord) -> Ordering {
    asc_nulls_last(&a.fields.starting_date, &b.fields.starting_date)
        .then_with(|| desc_nulls_last(&a.photo_aging, &b.photo_aging))
        .then_with(|| desc_nulls_last(&a.price_aging, &b.price_aging))
}

/// Sort records into report order. Ties keep their input order.
pub fn sort_records(records: &mut [EnrichedRecord]) {
    records.sort_by(report_order);
}

/// Population counts for a finished report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub with_notes: usize,
    pub starting_date: usize,
    pub starting_price: usize,
    pub updated_price_date: usize,
    pub updated_price_amount: usize,
    pub updated_pictures: usize,
    pub inspection_uploaded: usize,
    /// Largest photo aging in the report.
    pub stalest_photos: Option<i64>,
    /// Largest price aging in the report.
    pub stalest_price: Option<i64>,
}

impl ReportSummary {
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        let count = |f: &dyn Fn(&EnrichedRecord) -> bool| records.iter().filter(|&r| f(r)).count();

        Self {
            total: records.len(),
            with_notes: count(&|r| r.record.notes.is_some()),
            starting_date: count(&|r| r.fields.starting_date.is_some()),
            starting_price: count(&|r| r.fields.starting_price.is_some()),
            updated_price_date: count(&|r| r.fields.updated_price_date.is_some()),
            updated_price_amount: count(&|r| r.fields.updated_price_amount.is_some()),
            updated_pictures: count(&|r| r.fields.updated_pictures.is_some()),
            inspection_uploaded: count(&|r| r.fields.inspection_uploaded.is_some()),
            stalest_photos: records.iter().filter_map(|r| r.photo_aging).max(),
            stalest_price: records.iter().filter_map(|r| r.price_aging).max(),
        }
    }
}

/// A finished, sorted report.
#[derive(Debug, Clone)]
pub struct Report {
    /// Date the aging columns are measured against.
    pub reference: NaiveDate,
    /// Records in report order.
    pub records: Vec<EnrichedRecord>,
    pub summary: ReportSummary,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl Report {
    /// Output rows in report order.
    pub fn rows(&self) -> Vec<ReportRow> {
        self.records.iter().map(ReportRow::from).collect()
    }
}

/// Turns inventory records into a sorted aging report.
///
/// The reference date is fixed when the assembler is built so that every
/// record in a run is aged against the same day.
pub struct ReportAssembler<E = NoteExtractor> {
    extractor: E,
    normalizer: Normalizer,
    reference: NaiveDate,
}

impl ReportAssembler<NoteExtractor> {
    /// Create an assembler with the default note rules.
    pub fn new(reference: NaiveDate) -> Self {
        Self {
            extractor: NoteExtractor::default(),
            normalizer: Normalizer::new(),
            reference,
        }
    }

    /// Create an assembler from configuration.
    pub fn from_config(config: &FleetConfig, reference: NaiveDate) -> Result<Self> {
        Ok(Self {
            extractor: NoteExtractor::from_config(&config.extraction)?,
            normalizer: Normalizer::from_config(&config.extraction),
            reference,
        })
    }
}

impl<E: EventExtractor> ReportAssembler<E> {
    /// Replace the note extractor.
    pub fn with_extractor<F: EventExtractor>(self, extractor: F) -> ReportAssembler<F> {
        ReportAssembler {
            extractor,
            normalizer: self.normalizer,
            reference: self.reference,
        }
    }

    /// Extract, normalize and age a single record.
    pub fn enrich(&self, record: Record) -> EnrichedRecord {
        let matches = match record.notes.as_deref() {
            Some(note) => self.extractor.extract(note),
            None => Vec::new(),
        };
        let fields = self.normalizer.normalize(&matches);
        let aging = Aging::of(&fields, self.reference);

        debug!(
            "{}: {} matches, photo aging {:?}, price aging {:?}",
            record.stock_number,
            matches.len(),
            aging.photo,
            aging.price
        );

        EnrichedRecord {
            record,
            fields,
            photo_aging: aging.photo,
            price_aging: aging.price,
        }
    }

    /// Sort already enriched records into a report.
    pub fn finish(&self, mut records: Vec<EnrichedRecord>, started: Instant) -> Report {
        sort_records(&mut records);
        let summary = ReportSummary::from_records(&records);

        info!(
            "Assembled report of {} records ({} with notes) as of {}",
            summary.total, summary.with_notes, self.reference
        );

        Report {
            reference: self.reference,
            records,
            summary,
            processing_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Enrich every record and sort the result.
    pub fn assemble(&self, records: Vec<Record>) -> Report {
        let started = Instant::now();
        let enriched = records.into_iter().map(|r| self.enrich(r)).collect();
        self.finish(enriched, started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{EventFields, EventKind, EventMatch};
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, 1).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn enriched(
        stock: &str,
        starting: Option<NaiveDate>,
        photo: Option<i64>,
        price: Option<i64>,
    ) -> EnrichedRecord {
        EnrichedRecord {
            record: Record::new(stock),
            fields: EventFields {
                starting_date: starting,
                ..EventFields::default()
            },
            photo_aging: photo,
            price_aging: price,
        }
    }

    fn stocks(records: &[EnrichedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.record.stock_number.as_str()).collect()
    }

    #[test]
    fn test_starting_date_nulls_last() {
        let mut records = vec![
            enriched("none", None, None, None),
            enriched("jan", Some(ymd(2023, 1, 1)), None, None),
            enriched("jun", Some(ymd(2023, 6, 1)), None, None),
        ];

        sort_records(&mut records);
        assert_eq!(stocks(&records), vec!["jan", "jun", "none"]);
    }

    #[test]
    fn test_tie_breakers() {
        let jan = Some(ymd(2023, 1, 1));
        let mut records = vec![
            enriched("a", jan, Some(5), Some(1)),
            enriched("b", jan, None, Some(9)),
            enriched("c", jan, Some(30), None),
            enriched("d", jan, Some(5), Some(7)),
            enriched("e", jan, Some(5), None),
        ];

        sort_records(&mut records);
        assert_eq!(stocks(&records), vec!["c", "d", "a", "e", "b"]);
    }

    #[test]
    fn test_stable_for_full_ties() {
        let mut records = vec![
            enriched("first", None, Some(3), None),
            enriched("second", None, Some(3), None),
        ];

        sort_records(&mut records);
        assert_eq!(stocks(&records), vec!["first", "second"]);
    }

    #[test]
    fn test_enrich_record() {
        let record = Record::new("T-1001")
            .with_notes("6/1/23 - Updated Pictures  6/11/23 - Updated Price 18,900")
            .with_list_price(Decimal::from_str("18900").unwrap());

        let assembler = ReportAssembler::new(today());
        let enriched = assembler.enrich(record);

        assert_eq!(enriched.fields.updated_pictures, Some(ymd(2023, 6, 1)));
        assert_eq!(enriched.photo_aging, Some(30));
        assert_eq!(enriched.fields.updated_price_date, Some(ymd(2023, 6, 11)));
        assert_eq!(enriched.price_aging, Some(20));
        assert_eq!(
            enriched.fields.updated_price_amount,
            Decimal::from_str("18900").ok()
        );
    }

    #[test]
    fn test_records_without_notes_are_kept() {
        let records = vec![
            Record::new("A"),
            Record::new("B").with_notes(""),
            Record::new("C").with_notes("6/21/23 - Listed"),
        ];

        let report = ReportAssembler::new(today()).assemble(records);

        assert_eq!(report.records.len(), 3);
        assert_eq!(stocks(&report.records), vec!["C", "A", "B"]);
        for r in &report.records[1..] {
            assert!(r.fields.is_empty());
            assert_eq!(r.photo_aging, None);
            assert_eq!(r.price_aging, None);
        }
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.with_notes, 1);
        assert_eq!(report.summary.stalest_photos, Some(10));
    }

    #[test]
    fn test_photo_aging_ten_days() {
        let date = today() - Duration::days(10);
        let note = format!("{} - Photos Verified", date.format("%-m/%-d/%y"));

        let report = ReportAssembler::new(today()).assemble(vec![Record::new("X").with_notes(note)]);
        assert_eq!(report.records[0].photo_aging, Some(10));
    }

    struct FixedExtractor;

    impl EventExtractor for FixedExtractor {
        fn extract(&self, _note: &str) -> Vec<EventMatch> {
            vec![EventMatch::dated(EventKind::StartingPrice, "1/1/23").with_amount("5,000")]
        }
    }

    #[test]
    fn test_custom_extractor() {
        let assembler = ReportAssembler::new(today()).with_extractor(FixedExtractor);
        let enriched = assembler.enrich(Record::new("Z").with_notes("anything"));

        assert_eq!(enriched.fields.starting_date, Some(ymd(2023, 1, 1)));
        assert_eq!(enriched.fields.starting_price, Decimal::from_str("5000").ok());
    }

    #[test]
    fn test_row_cells_follow_columns() {
        let record = Record::new("R-7")
            .with_display(DisplayFlag::Yes)
            .with_notes("1/3/23 - Starting Price 20,000")
            .with_list_price(Decimal::from_str("19500.00").unwrap());

        let report = ReportAssembler::new(today()).assemble(vec![record]);
        let rows = report.rows();

        assert_eq!(
            rows[0].cells(),
            [
                "R-7".to_string(),
                "True".to_string(),
                "2023-01-03".to_string(),
                "20000".to_string(),
                String::new(),
                String::new(),
                "19500.00".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ]
        );
    }
}
