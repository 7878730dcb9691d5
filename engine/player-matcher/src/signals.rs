use crate::policy::{MatchPolicy, Signal};
use chrono::NaiveDate;
use player_roster::{MatchEvidence, PlayerRecord, SignalOutcome};

/// Comparison keys of one record, folded once before the pairwise loop
#[derive(Debug, Clone)]
pub struct MatchKeys<'a> {
    pub record: &'a PlayerRecord,
    name: Option<String>,
    handle: Option<String>,
}

impl<'a> MatchKeys<'a> {
    pub fn new(record: &'a PlayerRecord) -> Self {
        Self {
            record,
            name: fold(record.display_name.as_deref()),
            handle: fold(record.handle.as_deref()),
        }
    }

    fn date_of_birth(&self) -> Option<&NaiveDate> {
        self.record.date_of_birth.as_ref()
    }
}

/// Case-insensitive key; empty or blank values are not comparable
fn fold(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_lowercase)
}

fn compare<T: PartialEq>(a: Option<&T>, b: Option<&T>) -> SignalOutcome {
    SignalOutcome::from_comparison(a.zip(b).map(|(a, b)| a == b))
}

/// Evaluate every enabled signal for a pair of records
///
/// Outcomes do not depend on argument order.
pub fn evaluate(a: &MatchKeys<'_>, b: &MatchKeys<'_>, policy: &MatchPolicy) -> MatchEvidence {
    let outcome = |signal: Signal, result: SignalOutcome| {
        if policy.is_enabled(signal) {
            result
        } else {
            SignalOutcome::Unevaluable
        }
    };

    MatchEvidence {
        name: outcome(Signal::Name, compare(a.name.as_ref(), b.name.as_ref())),
        handle: outcome(Signal::Handle, compare(a.handle.as_ref(), b.handle.as_ref())),
        date_of_birth: outcome(Signal::DateOfBirth, compare(a.date_of_birth(), b.date_of_birth())),
    }
}

/// Evaluate a single pair without precomputed keys
pub fn compare_records(a: &PlayerRecord, b: &PlayerRecord, policy: &MatchPolicy) -> MatchEvidence {
    evaluate(&MatchKeys::new(a), &MatchKeys::new(b), policy)
}
