//! Error types for the matcher

use player_roster::RosterError;
use thiserror::Error;

/// Result type alias for matcher operations
pub type Result<T> = std::result::Result<T, MatchError>;

/// Reasons a match policy is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("min_agreeing_signals must be at least 1")]
    ZeroThreshold,

    #[error("no signals enabled")]
    NoSignals,

    #[error("min_agreeing_signals is {threshold} but only {enabled} signals are enabled")]
    ThresholdTooHigh { threshold: usize, enabled: usize },
}

/// Errors that abort a cross-reference run
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Invalid match policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
}
