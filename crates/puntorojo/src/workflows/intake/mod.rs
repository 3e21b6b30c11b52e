mod mapping;
mod normalizer;
mod parser;
mod validator;

pub use validator::{validate_columns, CanonicalRow, CanonicalTable};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

/// Untyped table as read from a file or request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

/// Source layouts the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    Csv,
    Tsv,
    /// JSON array of row objects.
    Rows,
}

impl InputFormat {
    pub fn from_name(name: &str) -> Result<Self, LossImportError> {
        match name.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "json" | "rows" => Ok(Self::Rows),
            other => Err(LossImportError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LossImportError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_name(extension)
    }
}

#[derive(Debug)]
pub enum LossImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    UnsupportedFormat(String),
    /// A request carried neither delimited text nor JSON rows.
    MissingData,
}

impl std::fmt::Display for LossImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LossImportError::Io(err) => write!(f, "failed to read asset dataset: {}", err),
            LossImportError::Csv(err) => write!(f, "invalid delimited asset data: {}", err),
            LossImportError::Json(err) => write!(f, "invalid asset row payload: {}", err),
            LossImportError::UnsupportedFormat(format) if format.is_empty() => {
                write!(f, "unsupported input format; use CSV, TSV or JSON rows")
            }
            LossImportError::UnsupportedFormat(format) => write!(
                f,
                "unsupported input format '{}'; use CSV, TSV or JSON rows",
                format
            ),
            LossImportError::MissingData => {
                write!(f, "no asset data supplied; send `csv` text or `rows`")
            }
        }
    }
}

impl std::error::Error for LossImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LossImportError::Io(err) => Some(err),
            LossImportError::Csv(err) => Some(err),
            LossImportError::Json(err) => Some(err),
            LossImportError::UnsupportedFormat(_) | LossImportError::MissingData => None,
        }
    }
}

impl From<std::io::Error> for LossImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LossImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for LossImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub struct LossDatasetImporter;

impl LossDatasetImporter {
    /// Reads a dataset, choosing the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RawTable, LossImportError> {
        let format = InputFormat::from_path(&path)?;
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, format)
    }

    pub fn from_reader<R: Read>(reader: R, format: InputFormat) -> Result<RawTable, LossImportError> {
        match format {
            InputFormat::Csv => Ok(parser::parse_delimited(reader, b',')?),
            InputFormat::Tsv => Ok(parser::parse_delimited(reader, b'\t')?),
            InputFormat::Rows => {
                let rows: Vec<Map<String, Value>> = serde_json::from_reader(reader)?;
                Ok(Self::from_rows(&rows))
            }
        }
    }

    pub fn from_rows(rows: &[Map<String, Value>]) -> RawTable {
        parser::table_from_rows(rows)
    }
}
