//! Declarative pipeline definitions
//!
//! A pipeline file names the source and the map/reduce strategies to run,
//! so a transformation can be repeated without a long command line:
//!
//! ```toml
//! source = "sales.csv"
//! key = "region"
//! reduce = "sum"
//! include = ["units*", "revenue"]
//! exclude = ["unit_price"]
//! ```

use crate::error::{DataError, DataResult};
use crate::load::{Accessor, FileType, LoadOptions};
use crate::mapreduce::{emit, map, Mapper, ReduceFn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Built-in reduce strategies selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReduceStrategy {
    #[default]
    Last,
    First,
    Ident,
    Merge,
    Sum,
}

/// Pipeline settings as read from a TOML or YAML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// File path or URL to load
    pub source: Option<String>,
    /// Attribute to group by
    pub key: Option<String>,
    /// Substitutions applied to extracted key values
    pub remap: Option<HashMap<String, Value>>,
    pub reduce: ReduceStrategy,
    /// Field patterns summed by the `sum` strategy
    pub include: Vec<String>,
    /// Field patterns never summed by the `sum` strategy
    pub exclude: Vec<String>,
    /// Override the file type guessed from the extension
    pub file_type: Option<FileType>,
    /// Keep CSV/TSV fields as strings
    pub raw: bool,
}

impl PipelineConfig {
    /// Load a pipeline file, choosing the format by extension
    pub async fn from_path(path: &Path) -> DataResult<Self> {
        let location = path.display().to_string();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DataError::load_failed(&location, "Failed to read pipeline file", e))?;

        debug!("Loaded pipeline configuration from {}", location);
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content, &location),
            Some("toml") => Self::from_toml_str(&content, &location),
            _ => Err(DataError::config(format!(
                "Pipeline file must be .toml, .yaml or .yml: {}",
                location
            ))),
        }
    }

    pub fn from_toml_str(content: &str, location: &str) -> DataResult<Self> {
        toml::from_str(content).map_err(|e| DataError::Config {
            message: format!("Invalid pipeline file {}", location),
            source: Some(Box::new(e)),
        })
    }

    pub fn from_yaml_str(content: &str, location: &str) -> DataResult<Self> {
        serde_yaml::from_str(content).map_err(|e| DataError::Config {
            message: format!("Invalid pipeline file {}", location),
            source: Some(Box::new(e)),
        })
    }

    /// Mapper grouping by `key`, if one is configured
    pub fn mapper(&self) -> Option<Mapper> {
        let attr = self.key.as_ref()?;
        let key_map = match &self.remap {
            Some(remap) => map::key_remapped(attr.clone(), remap.clone()),
            None => map::key(attr.clone()),
        };
        Some(Mapper::from(key_map))
    }

    /// Reduce function for the configured strategy
    pub fn reducer(&self) -> DataResult<Box<dyn ReduceFn>> {
        Ok(match self.reduce {
            ReduceStrategy::Last => Box::new(emit::last()),
            ReduceStrategy::First => Box::new(emit::first()),
            ReduceStrategy::Ident => Box::new(emit::ident()),
            ReduceStrategy::Merge => Box::new(emit::merge()),
            ReduceStrategy::Sum => {
                let include: Vec<&str> = self.include.iter().map(String::as_str).collect();
                let exclude: Vec<&str> = self.exclude.iter().map(String::as_str).collect();
                Box::new(emit::sum(&include, &exclude)?)
            }
        })
    }

    pub fn load_options(&self) -> LoadOptions {
        let accessor = if self.raw {
            Accessor::Raw
        } else {
            Accessor::Numeric
        };
        LoadOptions {
            file_type: self.file_type,
            accessor,
            file_handler: None,
        }
    }
}
