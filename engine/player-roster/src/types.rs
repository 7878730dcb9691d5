use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One player as scraped from a single wiki
///
/// Serialized as a roster row with the columns `id,name,dob`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// In-game alias (e.g., "Faker")
    #[serde(rename = "id")]
    pub handle: Option<String>,

    /// Real name (e.g., "Lee Sang-hyeok")
    #[serde(rename = "name")]
    pub display_name: Option<String>,

    /// Date of birth, if declared and parsable
    #[serde(rename = "dob", default, deserialize_with = "csv::invalid_option")]
    pub date_of_birth: Option<NaiveDate>,
}

impl PlayerRecord {
    /// Create a new record, trimming text fields and dropping empty ones
    pub fn new(
        handle: Option<String>,
        display_name: Option<String>,
        date_of_birth: Option<NaiveDate>,
    ) -> Self {
        Self {
            handle: normalize_field(handle),
            display_name: normalize_field(display_name),
            date_of_birth,
        }
    }

    /// Re-apply field normalization (used after deserializing hand-edited files)
    pub fn normalized(self) -> Self {
        Self::new(self.handle, self.display_name, self.date_of_birth)
    }

    /// A record must carry a handle or a name to be kept
    pub fn is_identifiable(&self) -> bool {
        self.handle.is_some() || self.display_name.is_some()
    }
}

impl fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handle = self.handle.as_deref().unwrap_or("?");
        match &self.display_name {
            Some(name) => write!(f, "{handle} ({name})"),
            None => write!(f, "{handle}"),
        }
    }
}

/// Trim a scraped text value; empty strings count as absent
pub fn normalize_field(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Outcome of a single comparison signal between two records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalOutcome {
    /// Both sides have the field and the values are equal
    Agree,
    /// Both sides have the field and the values differ
    Disagree,
    /// At least one side lacks the field (or the signal is disabled)
    Unevaluable,
}

impl SignalOutcome {
    /// Build an outcome from an optional comparison result
    pub fn from_comparison(result: Option<bool>) -> Self {
        match result {
            Some(true) => SignalOutcome::Agree,
            Some(false) => SignalOutcome::Disagree,
            None => SignalOutcome::Unevaluable,
        }
    }

    pub fn is_agree(self) -> bool {
        self == SignalOutcome::Agree
    }

    pub fn is_evaluable(self) -> bool {
        self != SignalOutcome::Unevaluable
    }
}

/// The evidence gathered for one reference/candidate pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchEvidence {
    pub name: SignalOutcome,
    pub handle: SignalOutcome,
    pub date_of_birth: SignalOutcome,
}

impl MatchEvidence {
    fn outcomes(&self) -> [SignalOutcome; 3] {
        [self.name, self.handle, self.date_of_birth]
    }

    /// Number of signals that agree
    pub fn agreeing(&self) -> usize {
        self.outcomes().iter().filter(|o| o.is_agree()).count()
    }

    /// Number of signals both sides could be compared on
    pub fn evaluable(&self) -> usize {
        self.outcomes().iter().filter(|o| o.is_evaluable()).count()
    }
}

impl fmt::Display for MatchEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name={:?} handle={:?} dob={:?} ({}/{} agree)",
            self.name,
            self.handle,
            self.date_of_birth,
            self.agreeing(),
            self.evaluable()
        )
    }
}

/// A reference/candidate pair that cleared the match threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Record from the reference roster
    pub reference: PlayerRecord,

    /// Record from the candidate site's roster
    pub candidate: PlayerRecord,

    /// Site the candidate record was collected from
    pub candidate_site: String,

    /// Signal outcomes that led to acceptance (not persisted)
    pub evidence: MatchEvidence,
}

impl MatchCandidate {
    pub fn new(
        reference: PlayerRecord,
        candidate: PlayerRecord,
        candidate_site: impl Into<String>,
        evidence: MatchEvidence,
    ) -> Self {
        Self { reference, candidate, candidate_site: candidate_site.into(), evidence }
    }
}
