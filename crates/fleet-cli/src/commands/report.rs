//! Report command - build the aging report from an inventory export.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use fleet_core::models::config::{FleetConfig, ReportFormat};
use fleet_core::report::{Report, ReportAssembler, ReportRow, ReportSummary, COLUMNS};
use fleet_core::table::{read_records_from_path, to_csv_string, to_json_string};

use super::{load_config, parse_date, reference_date};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Inventory export (CSV with a header row)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file or directory (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config, csv)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Reference date for aging, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,

    /// Print population counts after the report
    #[arg(long)]
    summary: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV with the report columns
    Csv,
    /// JSON array of row objects
    Json,
    /// Aligned plain text table
    Text,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ReportFormat::Csv,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Text => ReportFormat::Text,
        }
    }
}

pub fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let reference = reference_date(args.as_of);
    info!("Building report from {} as of {}", args.input.display(), reference);

    let records = read_records_from_path(&args.input, &config.columns)?;
    let assembler = ReportAssembler::from_config(&config, reference)?;

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(records.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records")?
            .progress_chars("=>-"),
    );

    let enriched = records
        .into_iter()
        .map(|record| {
            let enriched = assembler.enrich(record);
            pb.inc(1);
            enriched
        })
        .collect();
    pb.finish_and_clear();

    let report = assembler.finish(enriched, start);

    let format = args
        .format
        .map(ReportFormat::from)
        .unwrap_or(config.output.format);

    // Rendered fully before anything is written
    let content = render(&report, format)?;

    match &args.output {
        Some(path) => {
            let output_path = resolve_output_path(path, &config, format);
            fs::write(&output_path, &content)?;
            eprintln!(
                "{} Wrote {} rows to {}",
                style("✓").green(),
                report.records.len(),
                output_path.display()
            );
        }
        None => print!("{}", content),
    }

    if args.summary {
        eprintln!("{}", format_summary(&report.summary, report.reference));
    }

    Ok(())
}

/// Directories get the configured file name.
fn resolve_output_path(path: &Path, config: &FleetConfig, format: ReportFormat) -> PathBuf {
    if path.is_dir() {
        path.join(format!("{}.{}", config.output.file_stem, format.extension()))
    } else {
        path.to_path_buf()
    }
}

fn render(report: &Report, format: ReportFormat) -> anyhow::Result<String> {
    let rows = report.rows();
    let content = match format {
        ReportFormat::Csv => to_csv_string(&rows)?,
        ReportFormat::Json => {
            let mut json = to_json_string(&rows)?;
            json.push('\n');
            json
        }
        ReportFormat::Text => format_report_text(&rows, report.reference),
    };
    Ok(content)
}

fn format_report_text(rows: &[ReportRow], reference: NaiveDate) -> String {
    let cells: Vec<[String; 11]> = rows.iter().map(ReportRow::cells).collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.len()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut output = String::new();
    output.push_str(&format_line(COLUMNS.iter().copied(), &widths));
    output.push_str(&format_line(dashes.iter().map(String::as_str), &widths));
    for row in &cells {
        output.push_str(&format_line(row.iter().map(String::as_str), &widths));
    }

    output.push_str(&format!("\n{} rows, aging as of {}\n", rows.len(), reference));
    output
}

fn format_line<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = values
        .zip(widths.iter())
        .map(|(value, width)| format!("{:<width$}", value, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}\n", line.trim_end())
}

fn format_summary(summary: &ReportSummary, reference: NaiveDate) -> String {
    let fmt_days = |days: Option<i64>| {
        days.map(|d| format!("{} days", d))
            .unwrap_or_else(|| "-".to_string())
    };

    let mut output = String::new();
    output.push_str(&format!("{}\n", style("Summary:").bold()));
    output.push_str(&format!("  Records:             {}\n", summary.total));
    output.push_str(&format!("  With notes:          {}\n", summary.with_notes));
    output.push_str(&format!("  Starting date:       {}\n", summary.starting_date));
    output.push_str(&format!("  Starting price:      {}\n", summary.starting_price));
    output.push_str(&format!("  Price updated:       {}\n", summary.updated_price_date));
    output.push_str(&format!("  Price amount:        {}\n", summary.updated_price_amount));
    output.push_str(&format!("  Pictures/listed:     {}\n", summary.updated_pictures));
    output.push_str(&format!("  Inspection uploaded: {}\n", summary.inspection_uploaded));
    output.push_str(&format!("  Stalest photos:      {}\n", fmt_days(summary.stalest_photos)));
    output.push_str(&format!("  Stalest price:       {}\n", fmt_days(summary.stalest_price)));
    output.push_str(&format!("  Aging as of:         {}", reference));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::DisplayFlag;

    #[test]
    fn test_text_table_alignment() {
        let rows = vec![ReportRow {
            stock_number: "T-100".to_string(),
            display_on_site: DisplayFlag::Yes,
            starting_date: None,
            starting_price: None,
            updated_price_date: None,
            updated_price_amount: None,
            current_price: None,
            price_aging: None,
            updated_pictures: None,
            photo_aging: Some(12),
            inspection_uploaded: None,
        }];
        let reference = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();

        let text = format_report_text(&rows, reference);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("StockNumber  DisplayOnSite  StartingDate"));
        assert!(lines[1].starts_with("-----------  -------------"));
        assert!(lines[2].starts_with("T-100        True"));
        assert!(text.ends_with("1 rows, aging as of 2023-07-01\n"));
    }
}
