//! CSV reader for the employee table.

use super::{EmployeeRecord, Table};
use crate::error::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::path::Path;

/// Read the employee table. Missing file, unreadable rows, duplicate ids or a
/// non-binary outcome all fail with `DataUnavailable`.
pub fn load_dataset(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| Error::data(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<EmployeeRecord>().enumerate() {
        let record = result.map_err(|e| Error::data(path, format!("row {}: {e}", row + 1)))?;
        records.push(record);
    }

    let table = Table::from_records(records).map_err(|e| Error::data(path, e))?;
    tracing::info!(path = %path.display(), rows = table.len(), "dataset loaded");
    Ok(table)
}

/// Spellings of a missing value written by common CSV exporters.
const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>",
];

#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Number(f64),
    Text(String),
}

/// Feature cell → `None` when missing or non-finite. Any other text is malformed.
pub(super) fn cell<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    let value = match Option::<Cell>::deserialize(d)? {
        None => return Ok(None),
        Some(Cell::Number(v)) => v,
        Some(Cell::Text(text)) => {
            let text = text.trim();
            if NA_TOKENS.contains(&text) {
                return Ok(None);
            }
            text.parse::<f64>()
                .map_err(|_| D::Error::custom(format!("invalid number '{text}'")))?
        }
    };
    Ok(value.is_finite().then_some(value))
}
