use anyhow::{Context, Result};
use std::io::{self, Read};
use tracing::debug;

use crate::data::PlotData;

/// Cell texts read as missing entries by default
pub const DEFAULT_NA_VALUES: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<PlotData> {
    read_csv(io::stdin().lock(), DEFAULT_NA_VALUES)
}

/// Read CSV data with a header row. Cells whose trimmed text is one of
/// `na_values` become missing entries; every other cell keeps its raw text.
pub fn read_csv<R: Read>(reader: R, na_values: &[&str]) -> Result<PlotData> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        anyhow::bail!("CSV must have a header row");
    }

    let mut rows = Vec::new();
    for (row_idx, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to parse CSV row {}", row_idx + 1))?;
        let row: Vec<Option<String>> = record
            .iter()
            .map(|field| {
                let trimmed = field.trim();
                if na_values.iter().any(|na| *na == trimmed) {
                    None
                } else {
                    Some(field.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        anyhow::bail!("CSV must contain at least one data row");
    }

    debug!(columns = headers.len(), rows = rows.len(), "read csv");
    Ok(PlotData::new(headers, rows))
}
