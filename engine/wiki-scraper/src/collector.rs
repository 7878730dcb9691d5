use crate::client::WikiClient;
use crate::error::Result;
use crate::infobox::extract_fields;
use crate::transport::WikiTransport;
use player_roster::{PlayerRecord, RosterStore};
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Outcome of collecting one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectReport {
    pub site: String,
    /// Pages returned with content
    pub pages_seen: usize,
    /// Records written to the roster file
    pub records_written: usize,
    /// Pages declaring neither a handle nor a name
    pub pages_discarded: usize,
    pub path: PathBuf,
}

/// Collects player rosters and writes one file per site
pub struct RosterCollector<T: WikiTransport> {
    client: WikiClient<T>,
    store: RosterStore,
    continue_on_error: bool,
}

impl<T: WikiTransport> RosterCollector<T> {
    /// Create a new collector
    pub fn new(client: WikiClient<T>, store: RosterStore, continue_on_error: bool) -> Self {
        Self { client, store, continue_on_error }
    }

    pub fn client(&self) -> &WikiClient<T> {
        &self.client
    }

    /// Collect a single site's roster
    ///
    /// Any transport or API error aborts the site before its file is
    /// touched; a previous roster for the site stays as it was.
    pub async fn collect_site(&self, site: &str) -> Result<CollectReport> {
        info!("Collecting players from {}", site);

        // Resolve the output path up front so a bad site name fails before any request
        self.store.roster_path(site)?;

        let batches = self.client.list_player_pages(site).await?;

        let mut records: Vec<PlayerRecord> = Vec::new();
        let mut pages_seen = 0;
        let mut pages_discarded = 0;

        for (index, batch) in batches.iter().enumerate() {
            let contents = self.client.fetch_page_contents(site, batch).await?;
            debug!("{}: batch {}/{} has {} pages", site, index + 1, batches.len(), contents.len());

            for page in contents {
                pages_seen += 1;
                match extract_fields(&page.wikitext).into_record() {
                    Some(record) => records.push(record),
                    None => {
                        pages_discarded += 1;
                        debug!("{}: page {} ({:?}) has no id or name", site, page.page_id, page.title);
                    }
                }
            }
        }

        let path = self.store.write_roster(site, &records)?;

        let report = CollectReport {
            site: site.to_string(),
            pages_seen,
            records_written: records.len(),
            pages_discarded,
            path,
        };
        info!(
            "Collected {} players from {} ({} pages, {} discarded)",
            report.records_written, site, report.pages_seen, report.pages_discarded
        );
        Ok(report)
    }

    /// Collect sites one after another in the given order
    ///
    /// With `continue_on_error` a failed site is logged and the next one is
    /// attempted; otherwise the loop stops at the first failure. Files
    /// written for earlier sites persist either way.
    pub async fn collect_all<S: AsRef<str>>(&self, sites: &[S]) -> Vec<(String, Result<CollectReport>)> {
        let mut outcomes = Vec::with_capacity(sites.len());

        for site in sites {
            let site = site.as_ref();
            let outcome = self.collect_site(site).await;
            let failed = outcome.is_err();

            if let Err(e) = &outcome {
                error!("Failed to collect {}: {}", site, e);
            }
            outcomes.push((site.to_string(), outcome));

            if failed && !self.continue_on_error {
                break;
            }
        }

        outcomes
    }
}
