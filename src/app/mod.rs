//! Application module
//!
//! This module contains application-level functionality including:
//! - Configuration handling
//! - Logging setup
//! - Pipeline definitions loaded from TOML or YAML files
//! - Fatal error reporting

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod pipeline;

// Re-export main application functions
pub use config::AppConfig;
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;
pub use pipeline::{PipelineConfig, ReduceStrategy};
