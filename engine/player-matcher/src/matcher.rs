use crate::policy::MatchPolicy;
use crate::signals::{evaluate, MatchKeys};
use player_roster::{MatchCandidate, PlayerRecord};
use tracing::debug;

/// Compare every reference record with every candidate record
///
/// Pairs whose evidence clears the policy threshold are returned in
/// reference order, then candidate order. Reference fields always fill the
/// reference slot of the result regardless of which side matched.
pub fn match_roster(
    reference: &[PlayerRecord],
    candidates: &[PlayerRecord],
    candidate_site: &str,
    policy: &MatchPolicy,
) -> Vec<MatchCandidate> {
    let reference_keys: Vec<MatchKeys<'_>> = reference.iter().map(MatchKeys::new).collect();
    let candidate_keys: Vec<MatchKeys<'_>> = candidates.iter().map(MatchKeys::new).collect();

    let mut matches = Vec::new();

    for r in &reference_keys {
        for c in &candidate_keys {
            let evidence = evaluate(r, c, policy);
            if !policy.accepts(&evidence) {
                continue;
            }

            debug!("Matched {} with {} on {}: {}", r.record, c.record, candidate_site, evidence);
            matches.push(MatchCandidate::new(
                r.record.clone(),
                c.record.clone(),
                candidate_site,
                evidence,
            ));
        }
    }

    matches
}
