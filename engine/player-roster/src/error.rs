//! Error types for roster storage

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;

/// Errors that can occur while reading or writing roster files
#[derive(Error, Debug)]
pub enum RosterError {
    /// I/O errors (directory creation, rename, flush)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding/decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No roster file has been collected for the site yet
    #[error("Roster for site '{site}' not found at {path:?}")]
    MissingRoster { site: String, path: PathBuf },

    /// Site names end up in file names, so they are restricted
    #[error("Invalid site name: '{0}'")]
    InvalidSite(String),
}

impl RosterError {
    /// Create a new missing roster error
    pub fn missing_roster(site: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingRoster { site: site.into(), path: path.into() }
    }
}
