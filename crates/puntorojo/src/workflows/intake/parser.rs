use super::RawTable;
use serde_json::{Map, Value};
use std::io::Read;

pub(crate) fn parse_delimited<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Builds a table from JSON row objects; headers follow first appearance across rows.
pub(crate) fn table_from_rows(rows: &[Map<String, Value>]) -> RawTable {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|header| row.get(header).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    RawTable { headers, rows }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.trim().to_string(),
        other => other.to_string(),
    }
}

/// Parses a numeric cell, rejecting blanks and non-finite values.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

#[cfg(test)]
pub(crate) fn parse_number_for_tests(value: &str) -> Option<f64> {
    parse_number(value)
}
