//! Core library for fleet inventory aging reports.
//!
//! This crate provides:
//! - Event extraction from free-text inventory notes (listing, photo,
//!   inspection and price events)
//! - Lenient normalization of note dates and amounts
//! - Photo and price aging against a fixed reference date
//! - Report assembly with a fixed column layout and ordering
//! - CSV input and CSV/JSON output of inventory tables

pub mod aging;
pub mod error;
pub mod models;
pub mod notes;
pub mod report;
pub mod table;

pub use aging::{days_since, Aging};
pub use error::{FleetError, InputError, Result};
pub use models::config::{FleetConfig, ReportFormat};
pub use models::record::{
    DisplayFlag, EnrichedRecord, EventFields, EventKind, EventMatch, ListPrice, Record,
};
pub use notes::{EventExtractor, NoteExtractor, Normalizer, Occurrence};
pub use report::{Report, ReportAssembler, ReportRow, ReportSummary, COLUMNS};
