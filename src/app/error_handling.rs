//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use crate::error::DataError;
use tracing::error;

/// Exit code for invalid input (unknown types, bad configuration)
pub const ARGUMENT_ERROR: i32 = 2;
/// Exit code for everything else
pub const GENERAL_ERROR: i32 = 1;

/// Exit code for an error, looking through the chain for a `DataError`
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.chain().find_map(|cause| cause.downcast_ref::<DataError>()) {
        Some(
            DataError::NoDataSpecification
            | DataError::UnknownFileType { .. }
            | DataError::InvalidPattern { .. }
            | DataError::Config { .. },
        ) => ARGUMENT_ERROR,
        _ => GENERAL_ERROR,
    }
}

/// Handle fatal errors and exit with appropriate status code
///
/// In verbose mode the full error chain is printed as well.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    eprintln!("Error: {error}");
    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code(&error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_for_data_errors() {
        let err = anyhow::Error::new(DataError::UnknownFileType {
            path: "x.xyz".to_string(),
        });
        assert_eq!(exit_code(&err), ARGUMENT_ERROR);

        let err = anyhow::Error::new(DataError::EmptyGroup {
            key: "k".to_string(),
        });
        assert_eq!(exit_code(&err), GENERAL_ERROR);
    }

    #[test]
    fn test_exit_code_looks_through_context() {
        let result: Result<(), DataError> = Err(DataError::NoDataSpecification);
        let err = result.context("Failed to load input").unwrap_err();
        assert_eq!(exit_code(&err), ARGUMENT_ERROR);
    }

    #[test]
    fn test_exit_code_for_other_errors() {
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), GENERAL_ERROR);
    }
}
