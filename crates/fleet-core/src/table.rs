//! Tabular input and output for inventory exports.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, warn};

use crate::error::{InputError, Result};
use crate::models::config::ColumnConfig;
use crate::models::record::{DisplayFlag, ListPrice, Record};
use crate::notes::rules::parse_amount;
use crate::report::{ReportRow, COLUMNS};

/// Positions of the required columns in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    stock_number: usize,
    display_on_site: usize,
    notes: usize,
    list_price: usize,
}

impl ColumnIndex {
    fn locate(headers: &StringRecord, columns: &ColumnConfig) -> Result<Self> {
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(InputError::Empty.into());
        }

        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name.trim())
                .ok_or_else(|| InputError::MissingColumn(name.to_string()).into())
        };

        Ok(Self {
            stock_number: find(&columns.stock_number)?,
            display_on_site: find(&columns.display_on_site)?,
            notes: find(&columns.notes)?,
            list_price: find(&columns.list_price)?,
        })
    }
}

fn parse_row(row: &StringRecord, index: ColumnIndex) -> Record {
    let cell = |i: usize| row.get(i).unwrap_or("");

    let price_cell = cell(index.list_price).trim();
    let list_price = if price_cell.is_empty() {
        None
    } else {
        match parse_amount(price_cell) {
            Some(amount) => Some(ListPrice::Amount(amount)),
            None => {
                warn!("Keeping unparseable list price {:?} as text", price_cell);
                Some(ListPrice::Unparsed(price_cell.to_string()))
            }
        }
    };

    let notes = cell(index.notes);
    Record {
        stock_number: cell(index.stock_number).trim().to_string(),
        display_on_site: DisplayFlag::parse(cell(index.display_on_site)),
        notes: if notes.trim().is_empty() {
            None
        } else {
            Some(notes.to_string())
        },
        list_price,
    }
}

/// Read inventory records from CSV data with a header row.
///
/// Extra columns are ignored. A missing required column, or a row whose
/// field count differs from the header, fails the whole read.
pub fn read_records<R: Read>(reader: R, columns: &ColumnConfig) -> Result<Vec<Record>> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| InputError::Read {
            row: 0,
            reason: e.to_string(),
        })?
        .clone();
    let index = ColumnIndex::locate(&headers, columns)?;

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row.map_err(|e| InputError::Read {
            row: i as u64 + 1,
            reason: e.to_string(),
        })?;
        records.push(parse_row(&row, index));
    }

    debug!("Read {} inventory records", records.len());
    Ok(records)
}

/// Read inventory records from a CSV file.
pub fn read_records_from_path(path: &Path, columns: &ColumnConfig) -> Result<Vec<Record>> {
    let file = File::open(path)?;
    read_records(file, columns)
}

/// Write report rows as CSV. The header row is always written.
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render report rows as a CSV string.
pub fn to_csv_string(rows: &[ReportRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Render report rows as a pretty JSON array.
pub fn to_json_string(rows: &[ReportRow]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
