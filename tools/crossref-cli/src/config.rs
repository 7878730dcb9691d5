//! # Configuration Management
//!
//! Embedded defaults, an optional TOML file and `CROSSREF_*` environment
//! overrides, applied in that order.

use anyhow::{anyhow, Context, Result};
use player_matcher::MatchPolicy;
use player_roster::RosterStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wiki_scraper::ScraperConfig;

/// Wikis scanned for players also listed on the reference wiki
pub const DEFAULT_SITES: [&str; 54] = [
    "counterstrike",
    "leagueoflegends",
    "dota2",
    "valorant",
    "rocketleague",
    "mobilelegends",
    "apexlegends",
    "rainbowsix",
    "starcraft2",
    "overwatch",
    "pubgmobile",
    "ageofempires",
    "pubg",
    "smash",
    "warcraft",
    "brawlstars",
    "wildrift",
    "starcraft",
    "fifa",
    "heroes",
    "artifact",
    "hearthstone",
    "fighters",
    "arenaofvalor",
    "callofduty",
    "fortnite",
    "freefire",
    "pokemon",
    "tft",
    "clashroyale",
    "halo",
    "worldofwarcraft",
    "arenafps",
    "tetris",
    "teamfortress",
    "paladins",
    "sideswipe",
    "crossfire",
    "brawlhalla",
    "zula",
    "simracing",
    "splatoon",
    "omegastrikers",
    "naraka",
    "clashofclans",
    "splitgate",
    "criticalops",
    "battalion",
    "runeterra",
    "autochess",
    "magic",
    "squadrons",
    "underlords",
    "battlerite",
];

/// Main configuration for the crossref tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossrefConfig {
    /// Directory holding roster files and the result file
    pub data_dir: PathBuf,
    /// Wiki whose players are looked up everywhere else
    pub reference_site: String,
    /// Wikis compared against the reference, in processing order
    pub sites: Vec<String>,
    /// Result file name inside `data_dir`
    pub result_file: String,
    pub scraper: ScraperConfig,
    pub matching: MatchPolicy,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Output format (pretty, json)
    pub format: String,
}

impl Default for CrossrefConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            reference_site: "trackmania".to_string(),
            sites: DEFAULT_SITES.iter().map(|s| s.to_string()).collect(),
            result_file: "matching_players.csv".to_string(),
            scraper: ScraperConfig::default(),
            matching: MatchPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl CrossrefConfig {
    /// Load configuration from an optional file plus the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply `CROSSREF_*` overrides from the given lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(data_dir) = lookup("CROSSREF_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Some(site) = lookup("CROSSREF_REFERENCE_SITE") {
            self.reference_site = site;
        }

        if let Some(delay) = lookup("CROSSREF_REQUEST_DELAY_MS") {
            self.scraper.request_delay_ms = delay
                .parse()
                .with_context(|| format!("Invalid CROSSREF_REQUEST_DELAY_MS: {}", delay))?;
        }

        if let Some(user_agent) = lookup("CROSSREF_USER_AGENT") {
            self.scraper.user_agent = user_agent;
        }

        if let Some(level) = lookup("CROSSREF_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("CROSSREF_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(anyhow!("Invalid log level: {}", self.logging.level)),
        }

        match self.logging.format.as_str() {
            "json" | "pretty" => {}
            _ => return Err(anyhow!("Invalid log format: {}", self.logging.format)),
        }

        if self.reference_site.trim().is_empty() {
            return Err(anyhow!("Reference site must not be empty"));
        }

        if self.result_file.trim().is_empty() {
            return Err(anyhow!("Result file name must not be empty"));
        }

        let store = self.store();
        for site in std::iter::once(&self.reference_site).chain(&self.sites) {
            store.roster_path(site).with_context(|| format!("Invalid site in configuration: {}", site))?;
        }

        self.scraper.validate().context("Invalid [scraper] configuration")?;
        self.matching.validate().context("Invalid [matching] configuration")?;

        Ok(())
    }

    pub fn store(&self) -> RosterStore {
        RosterStore::new(&self.data_dir)
    }

    /// Reference site first, then every configured site once
    pub fn collection_sites(&self) -> Vec<String> {
        let mut sites: Vec<String> = Vec::with_capacity(self.sites.len() + 1);
        for site in std::iter::once(&self.reference_site).chain(&self.sites) {
            if !sites.contains(site) {
                sites.push(site.clone());
            }
        }
        sites
    }
}
