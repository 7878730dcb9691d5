use crate::error::{Result, RosterError};
use crate::types::{MatchCandidate, PlayerRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Column header of a per-site roster file
pub const ROSTER_HEADER: [&str; 3] = ["id", "name", "dob"];

/// Column header of the cross-reference result file
pub const MATCH_HEADER: [&str; 7] =
    ["track_id", "game_id", "track_name", "game_name", "track_dob", "game_dob", "matching_game"];

/// Flat-file store for rosters and match results
///
/// Every site gets `<data_dir>/<site>_players.csv`. Files are written to a
/// temporary sibling first and renamed into place, so a reader never sees a
/// half-written roster.
#[derive(Debug, Clone)]
pub struct RosterStore {
    data_dir: PathBuf,
}

/// Persisted shape of a `MatchCandidate`; reference fields fill the `track_*` slots
#[derive(Serialize)]
struct MatchRow<'a> {
    track_id: Option<&'a str>,
    game_id: Option<&'a str>,
    track_name: Option<&'a str>,
    game_name: Option<&'a str>,
    track_dob: Option<NaiveDate>,
    game_dob: Option<NaiveDate>,
    matching_game: &'a str,
}

impl<'a> From<&'a MatchCandidate> for MatchRow<'a> {
    fn from(m: &'a MatchCandidate) -> Self {
        Self {
            track_id: m.reference.handle.as_deref(),
            game_id: m.candidate.handle.as_deref(),
            track_name: m.reference.display_name.as_deref(),
            game_name: m.candidate.display_name.as_deref(),
            track_dob: m.reference.date_of_birth,
            game_dob: m.candidate.date_of_birth,
            matching_game: &m.candidate_site,
        }
    }
}

impl RosterStore {
    /// Create a store rooted at `data_dir` (created lazily on first write)
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the roster file for a site
    pub fn roster_path(&self, site: &str) -> Result<PathBuf> {
        validate_site(site)?;
        Ok(self.data_dir.join(format!("{site}_players.csv")))
    }

    /// Whether a roster has been collected for the site
    pub fn has_roster(&self, site: &str) -> bool {
        self.roster_path(site).map(|p| p.exists()).unwrap_or(false)
    }

    /// Overwrite the site's roster, skipping records without handle or name
    pub fn write_roster(&self, site: &str, records: &[PlayerRecord]) -> Result<PathBuf> {
        let path = self.roster_path(site)?;
        let mut skipped = 0;

        write_atomically(&path, &ROSTER_HEADER, |writer| {
            for record in records {
                if !record.is_identifiable() {
                    skipped += 1;
                    continue;
                }
                writer.serialize(record)?;
            }
            Ok(())
        })?;

        if skipped > 0 {
            debug!("Skipped {} unidentifiable records for {}", skipped, site);
        }
        info!("Wrote {} records for {} to {:?}", records.len() - skipped, site, path);
        Ok(path)
    }

    /// Load a site's roster
    ///
    /// Rows that fail to decode are skipped with a warning; an unparsable
    /// `dob` cell loads as an absent date. Rows without handle or name are
    /// dropped.
    pub fn read_roster(&self, site: &str) -> Result<Vec<PlayerRecord>> {
        let path = self.roster_path(site)?;
        if !path.exists() {
            return Err(RosterError::missing_roster(site, path));
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;
        let mut records = Vec::new();

        for (row, result) in reader.deserialize::<PlayerRecord>().enumerate() {
            match result {
                Ok(record) => {
                    let record = record.normalized();
                    if record.is_identifiable() {
                        records.push(record);
                    }
                }
                Err(e) => {
                    warn!("Skipping malformed row {} in {:?}: {}", row + 1, path, e);
                }
            }
        }

        debug!("Loaded {} records for {} from {:?}", records.len(), site, path);
        Ok(records)
    }

    /// Path of a result file inside the data directory
    pub fn result_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// Overwrite the cross-reference result file
    pub fn write_matches(&self, file_name: &str, matches: &[MatchCandidate]) -> Result<PathBuf> {
        let path = self.result_path(file_name);

        write_atomically(&path, &MATCH_HEADER, |writer| {
            for m in matches {
                writer.serialize(MatchRow::from(m))?;
            }
            Ok(())
        })?;

        info!("Wrote {} matches to {:?}", matches.len(), path);
        Ok(path)
    }
}

/// Site names become file names: lowercase ASCII letters, digits, `-` and `_`
fn validate_site(site: &str) -> Result<()> {
    let valid = !site.is_empty()
        && site.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RosterError::InvalidSite(site.to_string()))
    }
}

fn write_atomically<F>(path: &Path, header: &[&str], write_rows: F) -> Result<()>
where
    F: FnOnce(&mut csv::Writer<fs::File>) -> Result<()>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result: Result<()> = (|| {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(&tmp_path)?;
        writer.write_record(header)?;
        write_rows(&mut writer)?;
        writer.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchEvidence, SignalOutcome};
    use tempfile::TempDir;

    fn record(handle: Option<&str>, name: Option<&str>, dob: Option<(i32, u32, u32)>) -> PlayerRecord {
        PlayerRecord::new(
            handle.map(str::to_string),
            name.map(str::to_string),
            dob.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        )
    }

    #[test]
    fn test_roster_round_trip_keeps_absent_fields() {
        let temp_dir = TempDir::new().unwrap();
        let store = RosterStore::new(temp_dir.path());

        let records = vec![
            record(Some("Faker"), Some("Lee Sang-hyeok"), Some((1996, 5, 7))),
            record(Some("Chovy"), None, None),
            record(None, Some("Jeong Ji-hoon"), Some((2001, 3, 3))),
        ];

        store.write_roster("leagueoflegends", &records).unwrap();
        let loaded = store.read_roster("leagueoflegends").unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_roster_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let store = RosterStore::new(temp_dir.path());

        let path = store
            .write_roster("dota2", &[record(Some("Miracle-"), None, Some((1997, 6, 20)))])
            .unwrap();

        assert_eq!(path, temp_dir.path().join("dota2_players.csv"));
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "id,name,dob\nMiracle-,,1997-06-20\n");
    }

    #[test]
    fn test_empty_roster_still_has_header() {
        let temp_dir = TempDir::new().unwrap();
        let store = RosterStore::new(temp_dir.path());

        let path = store.write_roster("tetris", &[]).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "id,name,dob\n");
        assert!(store.read_roster("tetris").unwrap().is_empty());
    }

    #[test]
    fn test_unidentifiable_records_are_never_written() {
        let temp_dir = TempDir::new().unwrap();
        let store = RosterStore::new(temp_dir.path());

        let records = vec![record(None, None, Some((2000, 1, 1))), record(Some("ZywOo"), None, None)];
        let path = store.write_roster("counterstrike", &records).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, "id,name,dob\nZywOo,,\n");
    }

    #[test]
    fn test_read_tolerates_bad_dates_and_blank_rows() {
        let temp_dir = TempDir::new().unwrap();
        let store = RosterStore::new(temp_dir.path());

        let path = store.roster_path("smash").unwrap();
        fs::write(&path, "id,name,dob\nMkLeo,Leonardo Lopez Perez,1996-09-?? \n,,\n Armada ,,1994-01-03\n")
            .unwrap();

        let loaded = store.read_roster("smash").unwrap();

        assert_eq!(
            loaded,
            vec![
                record(Some("MkLeo"), Some("Leonardo Lopez Perez"), None),
                record(Some("Armada"), None, Some((1994, 1, 3))),
            ]
        );
    }

    #[test]
    fn test_missing_roster() {
        let temp_dir = TempDir::new().unwrap();
        let store = RosterStore::new(temp_dir.path());

        assert!(!store.has_roster("halo"));
        let err = store.read_roster("halo").unwrap_err();
        assert!(matches!(err, RosterError::MissingRoster { .. }));
    }

    #[test]
    fn test_invalid_site_names_rejected() {
        let store = RosterStore::new("./data");

        assert!(matches!(store.roster_path("../etc"), Err(RosterError::InvalidSite(_))));
        assert!(matches!(store.roster_path(""), Err(RosterError::InvalidSite(_))));
        assert!(store.roster_path("age-of_empires2").is_ok());
    }

    #[test]
    fn test_match_file_places_reference_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = RosterStore::new(temp_dir.path().join("nested"));

        let evidence = MatchEvidence {
            name: SignalOutcome::Agree,
            handle: SignalOutcome::Agree,
            date_of_birth: SignalOutcome::Unevaluable,
        };
        let matches = vec![MatchCandidate::new(
            record(Some("Bren"), Some("Brendan Hugh"), Some((2000, 2, 2))),
            record(Some("bren"), Some("brendan hugh"), None),
            "rocketleague",
            evidence,
        )];

        let path = store.write_matches("matching_players.csv", &matches).unwrap();
        let content = fs::read_to_string(path).unwrap();

        assert_eq!(
            content,
            "track_id,game_id,track_name,game_name,track_dob,game_dob,matching_game\n\
             Bren,bren,Brendan Hugh,brendan hugh,2000-02-02,,rocketleague\n"
        );
    }

    #[test]
    fn test_no_temporary_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = RosterStore::new(temp_dir.path());

        store.write_roster("fifa", &[record(Some("MoAuba"), None, None)]).unwrap();

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["fifa_players.csv".to_string()]);
    }
}
