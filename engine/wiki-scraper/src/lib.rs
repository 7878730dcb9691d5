//! Wiki Scraper - collects player rosters from Liquipedia wikis
//!
//! Pages through each wiki's `Category:Players` listing with the MediaWiki
//! API, batch-fetches the infobox section of every player page, extracts
//! handle, real name and date of birth, and writes one roster file per wiki.

pub mod api;
pub mod client;
pub mod collector;
pub mod config;
pub mod dates;
pub mod error;
pub mod infobox;
pub mod transport;

pub use client::WikiClient;
pub use collector::{CollectReport, RosterCollector};
pub use config::ScraperConfig;
pub use error::{Result, ScrapeError};
pub use transport::{HttpTransport, WikiTransport};
