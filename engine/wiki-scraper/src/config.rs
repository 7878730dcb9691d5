use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// MediaWiki caps `gcmlimit` at 50 for regular clients
pub const MAX_BATCH_SIZE: u32 = 50;

/// Configuration for the roster collector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Base URL; each wiki lives under `<api_base>/<site>/api.php`
    pub api_base: String,

    /// Descriptive client identifier required by Liquipedia's API terms
    pub user_agent: String,

    /// Fixed pause after every API call, successful or not
    pub request_delay_ms: u64,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Category members fetched per listing page (and per detail batch)
    pub batch_size: u32,

    /// Category whose members are player pages
    pub category: String,

    /// Keep collecting other sites after one fails
    pub continue_on_error: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            api_base: "https://liquipedia.net".to_string(),
            user_agent: "ProsInMultipleEsports/1.0 (esports-crossref)".to_string(),
            request_delay_ms: 4000,
            timeout_secs: 30,
            batch_size: MAX_BATCH_SIZE,
            category: "Category:Players".to_string(),
            continue_on_error: true,
        }
    }
}

impl ScraperConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ScrapeError::config(format!(
                "batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ScrapeError::config("user_agent must not be empty"));
        }

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ScrapeError::config(format!("api_base is not an http(s) URL: {}", self.api_base)));
        }

        if self.timeout_secs == 0 {
            return Err(ScrapeError::config("timeout_secs must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScraperConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_delay(), Duration::from_secs(4));
    }

    #[test]
    fn test_batch_size_bounds() {
        let config = ScraperConfig { batch_size: 51, ..Default::default() };
        assert!(config.validate().is_err());

        let config = ScraperConfig { batch_size: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_http_base() {
        let config = ScraperConfig { api_base: "liquipedia.net".to_string(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ScrapeError::Config(_))));
    }
}
