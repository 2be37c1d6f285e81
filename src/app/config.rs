//! Application configuration
//!
//! This module handles application-wide configuration settings.

use anyhow::Result;
use std::path::PathBuf;

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Working directory relative paths are resolved against
    pub working_dir: PathBuf,
}

impl AppConfig {
    /// Create a new application configuration
    pub fn new(verbose: u8) -> Result<Self> {
        let working_dir = std::env::current_dir()
            .map_err(|e| anyhow::anyhow!("Failed to get current directory: {}", e))?;

        Ok(Self {
            verbose,
            working_dir,
        })
    }

    /// Set the working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace,hyper=debug,reqwest=debug",
        }
    }

    /// Resolve a source location against the working directory.
    ///
    /// URLs and absolute paths are returned unchanged.
    pub fn resolve(&self, location: &str) -> String {
        if crate::load::fetch::is_url(location) {
            return location.to_string();
        }
        let path = PathBuf::from(location);
        if path.is_absolute() {
            location.to_string()
        } else {
            self.working_dir.join(path).display().to_string()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            working_dir: PathBuf::from("."),
        }
    }
}
