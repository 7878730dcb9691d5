//! Player Roster - shared records and flat-file storage
//!
//! Holds the per-site `PlayerRecord` rows produced by the wiki collector,
//! the `MatchCandidate` rows produced by the matcher, and the CSV store
//! both phases use to hand data to each other.

pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, RosterError};
pub use store::RosterStore;
pub use types::{MatchCandidate, MatchEvidence, PlayerRecord, SignalOutcome};
