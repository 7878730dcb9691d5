use crate::error::PolicyError;
use player_roster::MatchEvidence;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One kind of evidence two records can be compared on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// Real name, case-insensitive
    Name,
    /// In-game handle, case-insensitive
    Handle,
    /// Exact calendar date of birth
    #[serde(rename = "dob")]
    DateOfBirth,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Name, Signal::Handle, Signal::DateOfBirth];
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Name => write!(f, "name"),
            Signal::Handle => write!(f, "handle"),
            Signal::DateOfBirth => write!(f, "dob"),
        }
    }
}

/// Decides which pairs count as the same player
///
/// The default accepts a pair when any two of the three signals agree,
/// whichever two they are. A pair with a single evaluable signal can never
/// reach that threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    /// Agreeing signals required to accept a pair
    pub min_agreeing_signals: usize,

    /// Signals that are evaluated; the rest are reported as unevaluable
    pub signals: Vec<Signal>,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self { min_agreeing_signals: 2, signals: Signal::ALL.to_vec() }
    }
}

impl MatchPolicy {
    pub fn new(min_agreeing_signals: usize, signals: Vec<Signal>) -> Self {
        Self { min_agreeing_signals, signals }
    }

    pub fn is_enabled(&self, signal: Signal) -> bool {
        self.signals.contains(&signal)
    }

    /// Number of distinct enabled signals
    pub fn enabled_count(&self) -> usize {
        Signal::ALL.iter().filter(|s| self.is_enabled(**s)).count()
    }

    /// Whether the evidence clears the threshold
    pub fn accepts(&self, evidence: &MatchEvidence) -> bool {
        evidence.agreeing() >= self.min_agreeing_signals
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), PolicyError> {
        let enabled = self.enabled_count();
        if enabled == 0 {
            return Err(PolicyError::NoSignals);
        }
        if self.min_agreeing_signals == 0 {
            return Err(PolicyError::ZeroThreshold);
        }
        if self.min_agreeing_signals > enabled {
            return Err(PolicyError::ThresholdTooHigh { threshold: self.min_agreeing_signals, enabled });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = MatchPolicy::default();

        assert_eq!(policy.min_agreeing_signals, 2);
        assert_eq!(policy.enabled_count(), 3);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(MatchPolicy::new(0, Signal::ALL.to_vec()).validate(), Err(PolicyError::ZeroThreshold));
        assert_eq!(MatchPolicy::new(1, vec![]).validate(), Err(PolicyError::NoSignals));
        assert_eq!(
            MatchPolicy::new(3, vec![Signal::Name, Signal::Handle, Signal::Name]).validate(),
            Err(PolicyError::ThresholdTooHigh { threshold: 3, enabled: 2 })
        );
    }

    #[test]
    fn test_signal_names_in_config() {
        let policy: MatchPolicy = toml::from_str("signals = [\"name\", \"dob\"]").unwrap();

        assert_eq!(policy.signals, vec![Signal::Name, Signal::DateOfBirth]);
        assert_eq!(policy.min_agreeing_signals, 2);
    }

    #[test]
    fn test_accepts_counts_only_agreeing_signals() {
        use player_roster::SignalOutcome::*;

        let policy = MatchPolicy::default();
        let one = MatchEvidence { name: Agree, handle: Disagree, date_of_birth: Disagree };
        let two = MatchEvidence { name: Disagree, handle: Agree, date_of_birth: Agree };

        assert!(!policy.accepts(&one));
        assert!(policy.accepts(&two));
        assert!(MatchPolicy::new(1, Signal::ALL.to_vec()).accepts(&one));
    }
}
