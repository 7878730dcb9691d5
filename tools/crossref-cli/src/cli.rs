//! # Command Line Interface
//!
//! Collect rosters from the configured wikis and cross-reference them
//! against the reference wiki.

use crate::config::CrossrefConfig;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use player_matcher::{CrossReferenceReport, CrossReferencer};
use std::path::PathBuf;
use tracing::info;
use wiki_scraper::{CollectReport, RosterCollector, WikiClient};

/// Finds players who compete in more than one esport
#[derive(Parser, Debug)]
#[command(name = "esports-crossref")]
#[command(about = "Cross-reference Liquipedia player rosters across esports")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for roster and result files (overrides configuration)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Collect player rosters from the wikis
    Collect {
        /// Collect only these sites (repeatable); defaults to the reference site plus every configured site
        #[arg(long = "site")]
        sites: Vec<String>,
    },
    /// Cross-reference existing roster files and write the result file
    Match,
    /// Collect every roster, then cross-reference
    Run,
    /// Show the reference site and the configured site list
    Sites,
}

/// CLI handler
pub struct CliHandler {
    config: CrossrefConfig,
}

impl CliHandler {
    pub fn new(config: CrossrefConfig) -> Self {
        Self { config }
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Collect { sites } => {
                let sites = if sites.is_empty() { self.config.collection_sites() } else { sites };
                self.collect(&sites).await?;
            }
            Commands::Match => {
                self.cross_reference()?;
            }
            Commands::Run => {
                self.collect(&self.config.collection_sites()).await?;
                self.cross_reference()?;
            }
            Commands::Sites => {
                self.show_sites();
            }
        }
        Ok(())
    }

    /// Collect rosters for the given sites, in order
    async fn collect(&self, sites: &[String]) -> Result<Vec<CollectReport>> {
        let client = WikiClient::http(&self.config.scraper).context("Failed to create wiki client")?;
        let collector = RosterCollector::new(client, self.config.store(), self.config.scraper.continue_on_error);

        info!("Collecting {} sites into {:?}", sites.len(), self.config.data_dir);
        let outcomes = collector.collect_all(sites).await;

        println!("{}", "Collection Summary".bold());
        println!("{}", "=".repeat(50));

        let mut reports = Vec::new();
        let mut failed = Vec::new();
        for (site, outcome) in outcomes {
            match outcome {
                Ok(report) => {
                    println!(
                        "{} {:<20} {} players ({} pages)",
                        "✓".green(),
                        site,
                        report.records_written,
                        report.pages_seen
                    );
                    reports.push(report);
                }
                Err(e) => {
                    println!("{} {:<20} {}", "✗".red(), site, e);
                    failed.push(site);
                }
            }
        }

        if !failed.is_empty() && !self.config.scraper.continue_on_error {
            return Err(anyhow!("Collection stopped after {} failed", failed.join(", ")));
        }
        if !failed.is_empty() {
            println!("{} {} sites failed: {}", "!".yellow(), failed.len(), failed.join(", "));
        }

        Ok(reports)
    }

    /// Cross-reference stored rosters and write the result file
    fn cross_reference(&self) -> Result<CrossReferenceReport> {
        let crossref = self.cross_referencer()?;
        let report = crossref
            .run(&self.config.sites)
            .with_context(|| format!("Failed to cross-reference against {}", self.config.reference_site))?;
        let path = crossref
            .write_report(&self.config.result_file, &report)
            .context("Failed to write result file")?;

        println!("{}", "Cross-reference Summary".bold());
        println!("{}", "=".repeat(50));
        for summary in &report.summaries {
            let matches = summary.matches.to_string();
            let matches = if summary.matches > 0 { matches.green() } else { matches.normal() };
            println!("{:<20} {} matches ({} players)", summary.site, matches, summary.candidate_records);
        }
        if !report.skipped_sites.is_empty() {
            println!("{} no roster for: {}", "!".yellow(), report.skipped_sites.join(", "));
        }
        println!("{} matches written to {}", report.matches.len(), path.display());

        Ok(report)
    }

    fn cross_referencer(&self) -> Result<CrossReferencer> {
        CrossReferencer::new(self.config.store(), self.config.reference_site.clone(), self.config.matching.clone())
            .context("Invalid match policy")
    }

    fn show_sites(&self) {
        println!("Reference: {}", self.config.reference_site.bold());
        println!("Sites ({}):", self.config.sites.len());
        for site in &self.config.sites {
            println!("  {}", site);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use player_roster::PlayerRecord;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_collect_sites() {
        let cli = Cli::try_parse_from(["esports-crossref", "collect", "--site", "dota2", "--site", "halo"]).unwrap();

        assert_eq!(cli.command, Commands::Collect { sites: vec!["dota2".into(), "halo".into()] });
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_global_options() {
        let cli = Cli::try_parse_from(["esports-crossref", "--config", "crossref.toml", "-d", "/tmp/out", "match"])
            .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("crossref.toml")));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(cli.command, Commands::Match);
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["esports-crossref", "scrape"]).is_err());
    }

    #[tokio::test]
    async fn test_match_command_writes_result_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = CrossrefConfig {
            data_dir: temp_dir.path().to_path_buf(),
            sites: vec!["rocketleague".into(), "halo".into()],
            ..Default::default()
        };
        let store = config.store();
        let dob = NaiveDate::from_ymd_opt(2001, 5, 5);
        store
            .write_roster("trackmania", &[PlayerRecord::new(Some("Scrapie".into()), Some("Marius".into()), dob)])
            .unwrap();
        store
            .write_roster("rocketleague", &[PlayerRecord::new(Some("scrapie".into()), None, dob)])
            .unwrap();

        let handler = CliHandler::new(config);
        handler.handle_command(Commands::Match).await.unwrap();

        let content = fs::read_to_string(temp_dir.path().join("matching_players.csv")).unwrap();
        assert_eq!(
            content,
            "track_id,game_id,track_name,game_name,track_dob,game_dob,matching_game\n\
             Scrapie,scrapie,Marius,,2001-05-05,2001-05-05,rocketleague\n"
        );
    }

    #[tokio::test]
    async fn test_match_without_reference_roster_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = CrossrefConfig { data_dir: temp_dir.path().to_path_buf(), ..Default::default() };

        let result = CliHandler::new(config).handle_command(Commands::Match).await;

        assert!(result.is_err());
        assert!(!temp_dir.path().join("matching_players.csv").exists());
    }
}
