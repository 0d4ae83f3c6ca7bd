//! Data models for inventory records and pipeline configuration.

pub mod config;
pub mod record;

pub use config::{ColumnConfig, ExtractionConfig, FleetConfig, OutputConfig, ReportFormat, RuleConfig, SuppressionConfig};
pub use record::{DisplayFlag, EnrichedRecord, EventFields, EventKind, EventMatch, ListPrice, Record};
