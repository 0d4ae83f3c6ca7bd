//! Configuration structures for the report pipeline.

use serde::{Deserialize, Serialize};

use super::record::EventKind;

/// Main configuration for the fleet pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Note extraction configuration.
    pub extraction: ExtractionConfig,

    /// Input column names.
    pub columns: ColumnConfig,

    /// Report output configuration.
    pub output: OutputConfig,
}

/// Note extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Event rules, one per kind.
    pub rules: Vec<RuleConfig>,

    /// Trailing-token suppression.
    pub suppression: SuppressionConfig,

    /// Two-digit years up to and including this value are 20xx, above it 19xx.
    pub two_digit_year_pivot: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            suppression: SuppressionConfig::default(),
            two_digit_year_pivot: 68,
        }
    }
}

/// A declarative event rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Event kind produced by this rule.
    pub kind: EventKind,

    /// Literal label synonyms, matched case-insensitively.
    pub labels: Vec<String>,

    /// Also look for an amount after the label.
    #[serde(default)]
    pub amount: bool,

    /// Drop this rule's match when the named kind matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yields_to: Option<EventKind>,
}

impl RuleConfig {
    pub fn new(kind: EventKind, labels: &[&str]) -> Self {
        Self {
            kind,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            amount: false,
            yields_to: None,
        }
    }

    pub fn with_amount(mut self) -> Self {
        self.amount = true;
        self
    }

    pub fn yielding_to(mut self, kind: EventKind) -> Self {
        self.yields_to = Some(kind);
        self
    }
}

/// Default rule set for the note format used by the inventory team.
pub fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::new(
            EventKind::PicturesUpdated,
            &[
                "Updated Pictures",
                "Updated Photos",
                "Pictures Verified",
                "Photos Verified",
            ],
        ),
        RuleConfig::new(EventKind::Listed, &["Listed", "Quick Listed"])
            .yielding_to(EventKind::PicturesUpdated),
        RuleConfig::new(EventKind::InspectionUploaded, &["Inspection Uploaded"]),
        RuleConfig::new(EventKind::PriceUpdated, &["Updated Price"]).with_amount(),
        RuleConfig::new(EventKind::StartingPrice, &["Starting Price"]).with_amount(),
    ]
}

/// Suppression of matches followed closely by a marker token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    /// Marker token, matched case-insensitively. Empty disables suppression.
    pub token: String,

    /// Number of characters after a match in which the token may start.
    pub window: usize,
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            token: "FB".to_string(),
            window: 10,
        }
    }
}

/// Names of the required input columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub stock_number: String,
    pub display_on_site: String,
    pub notes: String,
    pub list_price: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            stock_number: "StockNumber".to_string(),
            display_on_site: "DisplayOnSite".to_string(),
            notes: "InternalNotes".to_string(),
            list_price: "SaleListPrice".to_string(),
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
    Text,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Text => "txt",
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when none is given on the command line.
    pub format: ReportFormat,

    /// File stem used when the output path is a directory.
    pub file_stem: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Csv,
            file_stem: "fleet_data".to_string(),
        }
    }
}

impl FleetConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: FleetConfig =
            serde_json::from_str(r#"{"extraction": {"suppression": {"window": 4}}}"#).unwrap();

        assert_eq!(config.extraction.suppression.window, 4);
        assert_eq!(config.extraction.suppression.token, "FB");
        assert_eq!(config.extraction.rules.len(), 5);
        assert_eq!(config.columns.notes, "InternalNotes");
    }

    #[test]
    fn test_listed_yields_to_pictures() {
        let rules = default_rules();
        let listed = rules.iter().find(|r| r.kind == EventKind::Listed).unwrap();
        assert_eq!(listed.yields_to, Some(EventKind::PicturesUpdated));
    }
}
