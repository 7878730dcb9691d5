use crate::error::Result;
use crate::matcher::match_roster;
use crate::policy::MatchPolicy;
use player_roster::{MatchCandidate, PlayerRecord, RosterError, RosterStore};
use std::path::PathBuf;
use tracing::{info, warn};

/// Per-site statistics of a cross-reference run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    pub site: String,
    pub reference_records: usize,
    pub candidate_records: usize,
    pub pairs_compared: usize,
    pub matches: usize,
}

/// Result of cross-referencing the reference roster against every site
#[derive(Debug, Clone, Default)]
pub struct CrossReferenceReport {
    /// Accepted pairs in site order, then reference order, then candidate order
    pub matches: Vec<MatchCandidate>,
    pub summaries: Vec<SiteSummary>,
    /// Sites with no roster file on disk
    pub skipped_sites: Vec<String>,
}

/// Runs the matcher over the stored rosters
pub struct CrossReferencer {
    store: RosterStore,
    reference_site: String,
    policy: MatchPolicy,
}

impl CrossReferencer {
    /// Create a new cross-referencer; the policy is validated up front
    pub fn new(store: RosterStore, reference_site: impl Into<String>, policy: MatchPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { store, reference_site: reference_site.into(), policy })
    }

    pub fn reference_site(&self) -> &str {
        &self.reference_site
    }

    /// Load the reference roster and match it against each site in order
    pub fn run<S: AsRef<str>>(&self, sites: &[S]) -> Result<CrossReferenceReport> {
        let reference = self.store.read_roster(&self.reference_site)?;
        info!("Loaded {} reference players from {}", reference.len(), self.reference_site);
        self.run_with_reference(&reference, sites)
    }

    /// Match an already loaded reference roster against each site in order
    ///
    /// The reference site is skipped if listed. A site without a roster file
    /// is logged and skipped; any other storage error aborts the run.
    pub fn run_with_reference<S: AsRef<str>>(
        &self,
        reference: &[PlayerRecord],
        sites: &[S],
    ) -> Result<CrossReferenceReport> {
        let mut report = CrossReferenceReport::default();

        for site in sites {
            let site = site.as_ref();
            if site == self.reference_site {
                continue;
            }

            let candidates = match self.store.read_roster(site) {
                Ok(records) => records,
                Err(RosterError::MissingRoster { path, .. }) => {
                    warn!("No roster for {} at {:?}, skipping", site, path);
                    report.skipped_sites.push(site.to_string());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let matches = match_roster(reference, &candidates, site, &self.policy);
            let summary = SiteSummary {
                site: site.to_string(),
                reference_records: reference.len(),
                candidate_records: candidates.len(),
                pairs_compared: reference.len() * candidates.len(),
                matches: matches.len(),
            };
            info!(
                "{}: {} matches from {} candidates ({} pairs compared)",
                site, summary.matches, summary.candidate_records, summary.pairs_compared
            );

            report.matches.extend(matches);
            report.summaries.push(summary);
        }

        info!(
            "Cross-reference complete: {} matches across {} sites ({} skipped)",
            report.matches.len(),
            report.summaries.len(),
            report.skipped_sites.len()
        );
        Ok(report)
    }

    /// Persist the accepted pairs as the result table
    pub fn write_report(&self, file_name: &str, report: &CrossReferenceReport) -> Result<PathBuf> {
        Ok(self.store.write_matches(file_name, &report.matches)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MatchError, PolicyError};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn record(handle: Option<&str>, name: Option<&str>, dob: Option<(i32, u32, u32)>) -> PlayerRecord {
        PlayerRecord::new(
            handle.map(str::to_string),
            name.map(str::to_string),
            dob.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        )
    }

    fn seeded_store(temp_dir: &TempDir) -> RosterStore {
        let store = RosterStore::new(temp_dir.path());
        store
            .write_roster(
                "trackmania",
                &[
                    record(Some("Wirtual"), Some("Jakob Wirtual"), Some((1997, 9, 23))),
                    record(Some("Spam"), None, Some((2000, 3, 3))),
                    record(None, Some("Carl Jr"), None),
                ],
            )
            .unwrap();
        store
            .write_roster(
                "rocketleague",
                &[
                    record(Some("wirtual"), None, Some((1997, 9, 23))),
                    record(Some("SPAM"), Some("Someone Else"), Some((2000, 3, 3))),
                ],
            )
            .unwrap();
        store
            .write_roster("dota2", &[record(Some("Carl"), Some("carl jr"), Some((1990, 1, 1)))])
            .unwrap();
        store
    }

    #[test]
    fn test_run_across_sites() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir);
        let crossref = CrossReferencer::new(store, "trackmania", MatchPolicy::default()).unwrap();

        let report = crossref.run(&["rocketleague", "dota2", "halo"]).unwrap();

        assert_eq!(report.matches.len(), 2);
        assert!(report.matches.iter().all(|m| m.candidate_site == "rocketleague"));
        assert_eq!(report.skipped_sites, vec!["halo".to_string()]);
        assert_eq!(report.summaries.len(), 2);
        assert_eq!(report.summaries[0].pairs_compared, 6);
        assert_eq!(report.summaries[1].matches, 0);
    }

    #[test]
    fn test_reference_site_is_not_matched_against_itself() {
        let temp_dir = TempDir::new().unwrap();
        let crossref = CrossReferencer::new(seeded_store(&temp_dir), "trackmania", MatchPolicy::default()).unwrap();

        let report = crossref.run(&["trackmania", "dota2"]).unwrap();

        assert_eq!(report.summaries.len(), 1);
        assert_eq!(report.summaries[0].site, "dota2");
    }

    #[test]
    fn test_missing_reference_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let crossref =
            CrossReferencer::new(RosterStore::new(temp_dir.path()), "trackmania", MatchPolicy::default()).unwrap();

        let err = crossref.run(&["dota2"]).unwrap_err();

        assert!(matches!(err, MatchError::Roster(RosterError::MissingRoster { .. })));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let result = CrossReferencer::new(RosterStore::new(temp_dir.path()), "trackmania", MatchPolicy::new(0, vec![]));

        assert!(matches!(result, Err(MatchError::Policy(PolicyError::NoSignals))));
    }

    #[test]
    fn test_rerun_produces_identical_result_file() {
        let temp_dir = TempDir::new().unwrap();
        let crossref = CrossReferencer::new(seeded_store(&temp_dir), "trackmania", MatchPolicy::default()).unwrap();
        let sites = ["rocketleague", "dota2"];

        let first = crossref.run(&sites).unwrap();
        let path = crossref.write_report("matching_players.csv", &first).unwrap();
        let first_bytes = fs::read(&path).unwrap();

        let second = crossref.run(&sites).unwrap();
        crossref.write_report("matching_players.csv", &second).unwrap();
        let second_bytes = fs::read(&path).unwrap();

        assert_eq!(first_bytes, second_bytes);
        assert_eq!(
            String::from_utf8(first_bytes).unwrap(),
            "track_id,game_id,track_name,game_name,track_dob,game_dob,matching_game\n\
             Wirtual,wirtual,Jakob Wirtual,,1997-09-23,1997-09-23,rocketleague\n\
             Spam,SPAM,,Someone Else,2000-03-03,2000-03-03,rocketleague\n"
        );
    }
}
