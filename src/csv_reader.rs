use crate::data::{records_from_json, RawRecord};
use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Read records from CSV text with a header row.
///
/// Columns are matched by header name; unknown columns are ignored and
/// missing ones are left empty.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, row) in csv.deserialize::<RawRecord>().enumerate() {
        // Row numbers are 1-based and skip the header.
        let record = row.with_context(|| format!("Failed to parse CSV row {}", idx + 2))?;
        records.push(record);
    }

    debug!(rows = records.len(), "read CSV records");
    Ok(records)
}

pub fn read_records_from_stdin() -> Result<Vec<RawRecord>> {
    let stdin = io::stdin();
    read_records(stdin.lock())
}

/// Read records from a file. A `.json` extension selects the JSON array
/// form; anything else is read as CSV.
pub fn read_records_from_path(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        let value: serde_json::Value = serde_json::from_reader(io::BufReader::new(file))
            .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
        let records = records_from_json(&value)?;
        debug!(rows = records.len(), "read JSON records");
        return Ok(records);
    }

    read_records(file)
}
