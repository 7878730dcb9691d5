use crate::api::{self, DetailResponse, ListingResponse, PageContent, PageId};
use crate::config::ScraperConfig;
use crate::error::Result;
use crate::transport::{HttpTransport, QueryParams, WikiTransport};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Paced MediaWiki client for one or more Liquipedia wikis
///
/// Every call is followed by a fixed delay, whatever its outcome. There is
/// no retry and no adaptive backoff.
pub struct WikiClient<T: WikiTransport> {
    transport: T,
    delay: Duration,
    category: String,
    batch_size: u32,
}

impl WikiClient<HttpTransport> {
    /// Create a client that talks to the configured API over HTTP
    pub fn http(config: &ScraperConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(HttpTransport::new(config)?, config))
    }
}

impl<T: WikiTransport> WikiClient<T> {
    /// Create a client over any transport
    pub fn new(transport: T, config: &ScraperConfig) -> Self {
        Self {
            transport,
            delay: config.request_delay(),
            category: config.category.clone(),
            batch_size: config.batch_size,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Page through the player category and return the page-id batches in API order
    pub async fn list_player_pages(&self, site: &str) -> Result<Vec<Vec<PageId>>> {
        let base = api::listing_params(&self.category, self.batch_size);
        let mut continuation: Option<QueryParams> = None;
        let mut batches = Vec::new();

        loop {
            let params = match &continuation {
                Some(c) => api::merge_params(&base, c),
                None => base.clone(),
            };

            let listing: ListingResponse = self.call(site, &params).await?;
            let ids = listing.page_ids();
            debug!("{}: listing page {} returned {} pages", site, batches.len() + 1, ids.len());
            if !ids.is_empty() {
                batches.push(ids);
            }

            match listing.continue_params() {
                Some(next) => continuation = Some(next),
                None => break,
            }
        }

        info!(
            "{}: found {} player pages in {} batches",
            site,
            batches.iter().map(Vec::len).sum::<usize>(),
            batches.len()
        );
        Ok(batches)
    }

    /// Fetch the infobox section of every page in one batch
    pub async fn fetch_page_contents(&self, site: &str, page_ids: &[PageId]) -> Result<Vec<PageContent>> {
        if page_ids.is_empty() {
            return Ok(Vec::new());
        }

        let detail: DetailResponse = self.call(site, &api::detail_params(page_ids)).await?;
        let contents = detail.into_contents();
        debug!("{}: fetched content for {}/{} pages", site, contents.len(), page_ids.len());
        Ok(contents)
    }

    async fn call<R: DeserializeOwned>(&self, site: &str, params: &QueryParams) -> Result<R> {
        let outcome = self.transport.query(site, params).await;
        self.pause().await;
        api::decode(site, outcome?)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::ScrapeError;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses in order and records every request
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Value>>,
        requests: Mutex<Vec<(String, QueryParams)>>,
    }

    impl ScriptedTransport {
        pub fn new(responses: Vec<Value>) -> Self {
            Self { responses: Mutex::new(responses.into()), requests: Mutex::new(Vec::new()) }
        }

        pub fn requests(&self) -> Vec<(String, QueryParams)> {
            self.requests.lock().unwrap().clone()
        }

        pub fn param(request: &(String, QueryParams), key: &str) -> Option<String> {
            request.1.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        }
    }

    #[async_trait]
    impl WikiTransport for ScriptedTransport {
        async fn query(&self, site: &str, params: &QueryParams) -> Result<Value> {
            self.requests.lock().unwrap().push((site.to_string(), params.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ScrapeError::Status { status: 503, url: format!("scripted://{site}") })
        }
    }

    pub fn test_config() -> ScraperConfig {
        ScraperConfig { request_delay_ms: 0, ..Default::default() }
    }
}
