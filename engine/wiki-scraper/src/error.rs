//! Error types for roster collection

use thiserror::Error;

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Errors that abort the collection of a site
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// The API answered with an `error` payload
    #[error("API error from {site}: {code}: {info}")]
    Api { site: String, code: String, info: String },

    /// The response did not have the expected shape
    #[error("Malformed response from {site}: {source}")]
    Malformed {
        site: String,
        #[source]
        source: serde_json::Error,
    },

    /// Writing the roster file failed
    #[error("Roster storage error: {0}")]
    Roster(#[from] player_roster::RosterError),

    /// Invalid scraper configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
