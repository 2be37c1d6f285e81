//! Error types for loading and map/reduce operations
//!
//! Every variant carries a stable numeric code rendered in its message so
//! failures can be matched on programmatically and searched for in logs.

use thiserror::Error;

/// Result type used throughout the crate
pub type DataResult<T> = Result<T, DataError>;

/// Main error type for datadata
#[derive(Debug, Error)]
pub enum DataError {
    #[error("[E1001] No data specification provided")]
    NoDataSpecification,

    #[error("[E1002] Unknown file type for {path}")]
    UnknownFileType { path: String },

    #[error("[E1003] Failed to load data from {location}: {reason}")]
    LoadFailed {
        location: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E1004] Failed to parse data from {location}: {reason}")]
    Parse {
        location: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E2001] Cannot reduce empty group for key {key}")]
    EmptyGroup { key: String },

    #[error("[E2002] Invalid field pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("[E3001] Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DataError {
    /// Stable error code for this error
    pub fn code(&self) -> u16 {
        match self {
            Self::NoDataSpecification => 1001,
            Self::UnknownFileType { .. } => 1002,
            Self::LoadFailed { .. } => 1003,
            Self::Parse { .. } => 1004,
            Self::EmptyGroup { .. } => 2001,
            Self::InvalidPattern { .. } => 2002,
            Self::Config { .. } => 3001,
        }
    }

    pub(crate) fn load_failed(
        location: impl Into<String>,
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::LoadFailed {
            location: location.into(),
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn parse(
        location: impl Into<String>,
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Parse {
            location: location.into(),
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }
}
