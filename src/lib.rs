//! # datadata
//!
//! Load data from CSV, TSV or JSON files, URLs or in-memory records and
//! reshape it with map/reduce.
//!
//! ## Usage
//!
//! ```
//! use datadata::mapreduce::{emit, map, mapreduce};
//! use datadata::record::Key;
//! use serde_json::json;
//!
//! let records = vec![json!({"a": 1}), json!({"a": 1}), json!({"a": 2})];
//! let grouped = mapreduce(records, &mut map::key("a"), Some(&mut emit::ident())).unwrap();
//! assert_eq!(grouped.keys(), &[Key::Int(1), Key::Int(2)]);
//! ```
//!
//! ## Modules
//!
//! - `ordered_hash` - Insertion-ordered key/value container returned by the engine
//! - `mapreduce` - The map/reduce engine plus reusable map and reduce strategies
//! - `transform` - Composable record reshaping helpers
//! - `geo` - GeoJSON feature constructors
//! - `load` - Reading files and URLs and guessing their format
//! - `record` - Keys, records and value utilities
//! - `app` - Configuration, logging and error reporting for the CLI
pub mod app;
pub mod error;
pub mod geo;
pub mod load;
pub mod mapreduce;
pub mod ordered_hash;
pub mod record;
pub mod transform;

pub use error::{DataError, DataResult};
pub use load::{datadata, load, DataSpec, LoadOptions};
pub use mapreduce::{mapreduce, mapreducer, Mapper};
pub use ordered_hash::OrderedHash;
pub use record::{Key, Record};
