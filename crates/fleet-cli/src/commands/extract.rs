//! Extract command - show what the note rules find in one note.

use chrono::NaiveDate;
use clap::Args;
use console::style;
use serde_json::json;

use fleet_core::notes::rules::{format_amount, format_note_date};
use fleet_core::notes::{EventExtractor, NoteExtractor, Normalizer, Occurrence};
use fleet_core::{Aging, EventFields, EventMatch};

use super::{load_config, parse_date, reference_date};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Note text, e.g. "1/2/23 - Listed  1/5/23 - Updated Price 12,500"
    #[arg(required = true)]
    note: String,

    /// Reference date for aging, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let extractor = NoteExtractor::from_config(&config.extraction)?;
    let normalizer = Normalizer::from_config(&config.extraction);
    let reference = reference_date(args.as_of);

    let matches = extractor.extract(&args.note);
    let occurrences = extractor.occurrences(&args.note);
    let fields = normalizer.normalize(&matches);
    let aging = Aging::of(&fields, reference);

    if args.json {
        let output = json!({
            "matches": matches,
            "occurrences": occurrences,
            "fields": fields,
            "photo_aging": aging.photo,
            "price_aging": aging.price,
            "as_of": reference,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!(
            "{}",
            format_extraction(&matches, &occurrences, &fields, aging, reference, &normalizer)
        );
    }

    Ok(())
}

/// How a raw note date was read, when that is not obvious from the text.
///
/// Dates that only parse day-first, or that carry zero padding, are shown
/// in the month-first form they were taken to mean.
fn reading_of(raw: &str, normalizer: &Normalizer) -> Option<String> {
    let sep = raw.chars().find(|c| !c.is_ascii_digit())?;
    let written = format_note_date(normalizer.date(Some(raw))?, sep);
    (written != raw).then_some(written)
}

fn format_extraction(
    matches: &[EventMatch],
    occurrences: &[Occurrence],
    fields: &EventFields,
    aging: Aging,
    reference: NaiveDate,
    normalizer: &Normalizer,
) -> String {
    fn show<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
    }

    let mut output = String::new();

    output.push_str("Matches:\n");
    if matches.is_empty() {
        output.push_str(&format!("  {}\n", style("none").yellow()));
    }
    for m in matches {
        output.push_str(&format!("  {:<20} date: {}", m.kind.to_string(), show(m.date.as_deref())));
        if let Some(read_as) = m.date.as_deref().and_then(|raw| reading_of(raw, normalizer)) {
            output.push_str(&format!(" (read as {})", read_as));
        }
        if let Some(amount) = &m.amount {
            output.push_str(&format!("  amount: {}", amount));
        }
        output.push('\n');
    }

    output.push_str("\nOccurrences:\n");
    for o in occurrences {
        let (start, end) = o.found.position.unwrap_or_default();
        output.push_str(&format!(
            "  {:>4}..{:<4} {:<20} {:<7} {:<10} {:?}\n",
            start,
            end,
            o.kind.to_string(),
            if o.amount { "amount" } else { "date" },
            o.found.value,
            o.found.source.trim_end()
        ));
    }

    output.push_str("\nFields:\n");
    output.push_str(&format!("  StartingDate:       {}\n", show(fields.starting_date)));
    output.push_str(&format!("  StartingPrice:      {}\n", show(fields.starting_price.map(format_amount))));
    output.push_str(&format!("  UpdatedPriceDate:   {}\n", show(fields.updated_price_date)));
    output.push_str(&format!("  UpdatedPriceAmount: {}\n", show(fields.updated_price_amount.map(format_amount))));
    output.push_str(&format!("  UpdatedPictures:    {}\n", show(fields.updated_pictures)));
    output.push_str(&format!("  InspectionUploaded: {}\n", show(fields.inspection_uploaded)));

    output.push_str(&format!("\nAging as of {}:\n", reference));
    output.push_str(&format!("  PhotoAging: {}\n", show(aging.photo)));
    output.push_str(&format!("  PriceAging: {}\n", show(aging.price)));

    output
}
