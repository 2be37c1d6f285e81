//! Loading data from files, URLs and in-memory records
//!
//! This is the I/O boundary in front of the map/reduce engine: it turns a
//! [`DataSpec`] into a plain, fully materialized sequence of records and
//! then hands that sequence to [`mapreduce`]. The returned futures can be
//! cancelled by dropping them.

pub mod fetch;
pub mod format;

pub use format::{FileHandler, FileType};

use crate::error::{DataError, DataResult};
use crate::mapreduce::{map, mapreduce, Mapper, ReduceFn, Reduced};
use crate::record::Record;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Field added to dictionary entries so map functions can see their key
pub const KEY_FIELD: &str = "__key__";

/// Where the data comes from
#[derive(Debug, Clone)]
pub enum DataSpec {
    /// A file path or an http(s) URL
    Path(String),
    /// Records that are already in memory
    Records(Vec<Value>),
}

impl From<&str> for DataSpec {
    fn from(path: &str) -> Self {
        DataSpec::Path(path.to_string())
    }
}

impl From<String> for DataSpec {
    fn from(path: String) -> Self {
        DataSpec::Path(path)
    }
}

impl From<Vec<Value>> for DataSpec {
    fn from(records: Vec<Value>) -> Self {
        DataSpec::Records(records)
    }
}

/// Per-row conversion applied to CSV and TSV rows
#[derive(Clone, Default)]
pub enum Accessor {
    /// Convert numeric strings to numbers
    #[default]
    Numeric,
    /// Keep every field as a string
    Raw,
    /// Arbitrary row conversion
    Custom(Arc<dyn Fn(Record) -> Record + Send + Sync>),
}

impl Accessor {
    pub fn apply(&self, row: Record) -> Record {
        match self {
            Accessor::Numeric => format::numeric_row(row),
            Accessor::Raw => row,
            Accessor::Custom(func) => func(row),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "Numeric"),
            Self::Raw => write!(f, "Raw"),
            Self::Custom(_) => write!(f, "Custom(<function>)"),
        }
    }
}

/// Options controlling how a path is read
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Override the type guessed from the extension
    pub file_type: Option<FileType>,
    pub accessor: Accessor,
    /// Parse the content with this handler instead of a built-in file type
    pub file_handler: Option<FileHandler>,
}

impl LoadOptions {
    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = Some(file_type);
        self
    }

    pub fn with_accessor(mut self, accessor: Accessor) -> Self {
        self.accessor = accessor;
        self
    }

    pub fn with_file_handler(mut self, handler: FileHandler) -> Self {
        self.file_handler = Some(handler);
        self
    }
}

/// Load the raw document without map/reduce.
///
/// CSV and TSV give an array of row objects, JSON gives the parsed document
/// and in-memory records are returned as an array.
pub async fn load(spec: impl Into<DataSpec>, options: &LoadOptions) -> DataResult<Value> {
    match spec.into() {
        DataSpec::Records(records) => Ok(Value::Array(records)),
        DataSpec::Path(path) => load_path(&path, options).await,
    }
}

async fn load_path(path: &str, options: &LoadOptions) -> DataResult<Value> {
    if path.trim().is_empty() {
        return Err(DataError::NoDataSpecification);
    }
    if let Some(handler) = &options.file_handler {
        info!("Loading data from {} with a custom file handler", path);
        let content = fetch::read_source(path).await?;
        return handler.parse(&content, &options.accessor, path);
    }

    let file_type = match options.file_type {
        Some(file_type) => file_type,
        None => FileType::detect(path)?,
    };

    info!("Loading {} data from {}", file_type, path);
    let content = fetch::read_source(path).await?;
    format::parse(&content, file_type, &options.accessor, path)
}

/// Load data and run it through the map/reduce engine.
///
/// Arrays are mapped record by record; without a mapper each record is keyed
/// by its position. A JSON object is treated as a dictionary: without a
/// mapper its entries pass through keyed by their own keys, otherwise each
/// object entry gets a `__key__` field and is handed to the mapper. Any
/// other document is treated as a single record.
pub async fn datadata(
    spec: impl Into<DataSpec>,
    mapper: Option<Mapper>,
    reduce: Option<&mut (dyn ReduceFn + '_)>,
    options: &LoadOptions,
) -> DataResult<Reduced> {
    let document = load(spec, options).await?;
    reduce_document(document, mapper, reduce)
}

/// Run map/reduce over an already loaded document
pub fn reduce_document(
    document: Value,
    mapper: Option<Mapper>,
    reduce: Option<&mut (dyn ReduceFn + '_)>,
) -> DataResult<Reduced> {
    match (document, mapper) {
        (Value::Array(records), Some(mut mapper)) => mapreduce(records, &mut mapper, reduce),
        (Value::Array(records), None) => mapreduce(records, &mut map::index(), reduce),
        (Value::Object(fields), None) => {
            debug!("Reducing dictionary with {} entries by key", fields.len());
            let keys: Vec<Value> = fields.keys().map(|k| Value::String(k.clone())).collect();
            mapreduce(keys, &mut map::dict(fields), reduce)
        }
        (Value::Object(fields), Some(mut mapper)) => {
            debug!("Mapping {} dictionary entries", fields.len());
            let records = fields.into_iter().map(|(key, mut value)| {
                if let Some(obj) = value.as_object_mut() {
                    obj.insert(KEY_FIELD.to_string(), Value::String(key));
                }
                value
            });
            mapreduce(records, &mut mapper, reduce)
        }
        (other, Some(mut mapper)) => mapreduce(vec![other], &mut mapper, reduce),
        (other, None) => mapreduce(vec![other], &mut map::index(), reduce),
    }
}
