//! File type detection and parsing
//!
//! Types are guessed from the extension of the final path segment (URL
//! query strings and fragments are ignored) unless the caller overrides it.

use super::Accessor;
use crate::error::{DataError, DataResult};
use crate::record::{coerce_numeric, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Json,
    Csv,
    Tsv,
}

impl FileType {
    /// Extensions recognised for this type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileType::Json => &["json", "topojson", "geojson"],
            FileType::Csv => &["csv"],
            FileType::Tsv => &["tsv", "tab"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<FileType> {
        let ext = ext.to_lowercase();
        [FileType::Json, FileType::Csv, FileType::Tsv]
            .into_iter()
            .find(|ft| ft.extensions().contains(&ext.as_str()))
    }

    /// Guess the type of a file path or URL from its extension
    pub fn detect(location: &str) -> DataResult<FileType> {
        extension_of(location)
            .and_then(|ext| FileType::from_extension(&ext))
            .ok_or_else(|| DataError::UnknownFileType {
                path: location.to_string(),
            })
    }

    fn delimiter(&self) -> Option<u8> {
        match self {
            FileType::Csv => Some(b','),
            FileType::Tsv => Some(b'\t'),
            FileType::Json => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Json => write!(f, "json"),
            FileType::Csv => write!(f, "csv"),
            FileType::Tsv => write!(f, "tsv"),
        }
    }
}

impl FromStr for FileType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(FileType::Json),
            "csv" => Ok(FileType::Csv),
            "tsv" => Ok(FileType::Tsv),
            other => Err(DataError::config(format!("Unsupported file type: {}", other))),
        }
    }
}

fn extension_of(location: &str) -> Option<String> {
    let path = match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.path().to_string(),
        _ => location.to_string(),
    };
    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_string)
}

type HandlerFn = dyn Fn(&str, &Accessor, &str) -> DataResult<Value> + Send + Sync;

/// Caller-supplied parser used instead of the built-in file types.
///
/// The function receives the raw content, the row accessor and the location
/// (for error messages) and returns the loaded document.
#[derive(Clone)]
pub struct FileHandler(Arc<HandlerFn>);

impl FileHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &Accessor, &str) -> DataResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(handler))
    }

    /// Rows separated by an arbitrary single-byte delimiter, with a header
    /// row and the accessor applied to each row
    pub fn delimited(delimiter: u8) -> Self {
        Self::new(move |content, accessor, location| {
            let rows = parse_delimited(content, delimiter, accessor, location)?;
            debug!("Parsed {} delimited rows from {}", rows.len(), location);
            Ok(Value::Array(rows))
        })
    }

    pub fn parse(&self, content: &str, accessor: &Accessor, location: &str) -> DataResult<Value> {
        (self.0)(content, accessor, location)
    }
}

impl fmt::Debug for FileHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileHandler(<function>)")
    }
}

/// Parse `content` into a JSON document.
///
/// CSV and TSV yield an array of row objects with the accessor applied to
/// each row; JSON is returned as parsed.
pub fn parse(
    content: &str,
    file_type: FileType,
    accessor: &Accessor,
    location: &str,
) -> DataResult<Value> {
    match file_type.delimiter() {
        Some(delimiter) => {
            let rows = parse_delimited(content, delimiter, accessor, location)?;
            debug!("Parsed {} {} rows from {}", rows.len(), file_type, location);
            Ok(Value::Array(rows))
        }
        None => serde_json::from_str(content)
            .map_err(|e| DataError::parse(location, "Failed to parse JSON", e)),
    }
}

fn parse_delimited(
    content: &str,
    delimiter: u8,
    accessor: &Accessor,
    location: &str,
) -> DataResult<Vec<Value>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DataError::parse(location, "Failed to read header row", e))?
        .clone();

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| DataError::parse(location, format!("Invalid row {}", index), e))?;
        let row: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header.to_string(), Value::String(field.to_string())))
            .collect();
        rows.push(Value::Object(accessor.apply(row)));
    }
    Ok(rows)
}

/// Default row accessor: numeric strings become numbers
pub(crate) fn numeric_row(row: Record) -> Record {
    row.into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k, coerce_numeric(&s)),
            other => (k, other),
        })
        .collect()
}
