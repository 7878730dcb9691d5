use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Query parameters for one API call, in request order
pub type QueryParams = Vec<(String, String)>;

/// A source of MediaWiki API responses
///
/// The HTTP implementation talks to Liquipedia; tests script responses.
#[async_trait]
pub trait WikiTransport: Send + Sync {
    /// Issue one read-only API query against a site and return the JSON body
    async fn query(&self, site: &str, params: &QueryParams) -> Result<Value>;
}

/// Liquipedia `api.php` over HTTPS
pub struct HttpTransport {
    client: Client,
    api_base: String,
}

impl HttpTransport {
    /// Create a new transport from scraper configuration
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .gzip(true)
            .build()?;

        Ok(Self { client, api_base: config.api_base.trim_end_matches('/').to_string() })
    }

    /// API endpoint of a site
    pub fn endpoint(&self, site: &str) -> String {
        format!("{}/{}/api.php", self.api_base, site)
    }
}

#[async_trait]
impl WikiTransport for HttpTransport {
    async fn query(&self, site: &str, params: &QueryParams) -> Result<Value> {
        let url = self.endpoint(site);
        debug!("GET {} {:?}", url, params);

        let response = self.client.get(&url).query(params).send().await?;

        if !response.status().is_success() {
            return Err(ScrapeError::Status { status: response.status().as_u16(), url });
        }

        Ok(response.json::<Value>().await?)
    }
}
