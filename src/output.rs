//! CSV export of survey records and pretty-printing of results.

use anyhow::Result;
use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::services::survey_store::SurveyRecord;

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Renders records as CSV text: one header row, then one row per record.
///
/// The header is the union of all columns in first-seen order, so a record
/// missing a column gets an empty cell. Rows end in CRLF.
pub fn records_to_csv(records: &[SurveyRecord]) -> Result<String> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let header = column_union(records);
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(&header)?;
    for record in records {
        writer.write_record(header.iter().map(|column| cell(record.get(column))))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    debug!(rows = records.len(), columns = header.len(), bytes = bytes.len(), "CSV rendered");
    Ok(String::from_utf8(bytes)?)
}

fn column_union(records: &[SurveyRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for column in records.iter().flat_map(SurveyRecord::columns) {
        if !columns.iter().any(|c| c == column) {
            columns.push(column.to_string());
        }
    }
    columns
}

/// Strings are written raw, null and absent values as empty cells, and
/// nested values as compact JSON.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(nested) => nested.to_string(),
    }
}
