//! MediaWiki query parameters and response shapes

use crate::error::{Result, ScrapeError};
use crate::transport::QueryParams;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Numeric MediaWiki page id
pub type PageId = u64;

/// Wikitext of one player page (section 0, main slot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub page_id: PageId,
    pub title: Option<String>,
    pub wikitext: String,
}

/// Response to a `generator=categorymembers` listing query
#[derive(Debug, Deserialize)]
pub struct ListingResponse {
    #[serde(default)]
    pub query: Option<PageSet<ListedPage>>,

    /// Continuation token, merged into the next request as-is
    #[serde(rename = "continue", default)]
    pub continuation: Option<BTreeMap<String, Value>>,
}

/// Response to a `prop=revisions` detail query
#[derive(Debug, Deserialize)]
pub struct DetailResponse {
    #[serde(default)]
    pub query: Option<PageSet<DetailPage>>,
}

#[derive(Debug, Deserialize)]
pub struct PageSet<P> {
    #[serde(default = "BTreeMap::new")]
    pub pages: BTreeMap<String, P>,
}

#[derive(Debug, Deserialize)]
pub struct ListedPage {
    #[serde(default)]
    pub pageid: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailPage {
    #[serde(default)]
    pub pageid: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
pub struct Revision {
    #[serde(default)]
    pub slots: Option<Slots>,
}

#[derive(Debug, Deserialize)]
pub struct Slots {
    #[serde(default)]
    pub main: Option<SlotContent>,
}

#[derive(Debug, Deserialize)]
pub struct SlotContent {
    /// `*` in the default response format, `content` with `formatversion=2`
    #[serde(rename = "*", alias = "content", default)]
    pub content: Option<String>,
}

impl ListingResponse {
    /// Listed page ids in ascending order; missing pages (non-positive ids) are skipped
    pub fn page_ids(&self) -> Vec<PageId> {
        let mut ids: Vec<PageId> = self
            .query
            .iter()
            .flat_map(|q| q.pages.values())
            .filter_map(|p| p.pageid)
            .filter(|id| *id > 0)
            .map(|id| id as PageId)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Continuation values rendered as request parameters
    pub fn continue_params(&self) -> Option<QueryParams> {
        self.continuation.as_ref().map(|c| {
            c.iter()
                .map(|(k, v)| {
                    let value = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), value)
                })
                .collect()
        })
    }
}

impl DetailResponse {
    /// Page contents in ascending page-id order; pages without content are dropped
    pub fn into_contents(self) -> Vec<PageContent> {
        let mut contents: Vec<PageContent> = self
            .query
            .map(|q| q.pages.into_values().collect::<Vec<_>>())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|page| {
                let page_id = page.pageid.filter(|id| *id > 0)? as PageId;
                let wikitext = page
                    .revisions
                    .into_iter()
                    .next()
                    .and_then(|r| r.slots)
                    .and_then(|s| s.main)
                    .and_then(|m| m.content);
                match wikitext {
                    Some(wikitext) => Some(PageContent { page_id, title: page.title, wikitext }),
                    None => {
                        tracing::debug!("Page {} has no revision content", page_id);
                        None
                    }
                }
            })
            .collect();
        contents.sort_by_key(|c| c.page_id);
        contents
    }
}

/// Parameters of a category listing query
pub fn listing_params(category: &str, batch_size: u32) -> QueryParams {
    vec![
        ("action".to_string(), "query".to_string()),
        ("format".to_string(), "json".to_string()),
        ("generator".to_string(), "categorymembers".to_string()),
        ("gcmtitle".to_string(), category.to_string()),
        ("gcmprop".to_string(), "ids|title".to_string()),
        ("gcmlimit".to_string(), batch_size.to_string()),
    ]
}

/// Parameters of a batch detail query for the infobox section of each page
pub fn detail_params(page_ids: &[PageId]) -> QueryParams {
    let ids = page_ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join("|");
    vec![
        ("action".to_string(), "query".to_string()),
        ("format".to_string(), "json".to_string()),
        ("pageids".to_string(), ids),
        ("prop".to_string(), "revisions".to_string()),
        ("rvprop".to_string(), "content".to_string()),
        ("rvslots".to_string(), "main".to_string()),
        ("rvsection".to_string(), "0".to_string()),
    ]
}

/// Merge continuation values into a base request, replacing existing keys
pub fn merge_params(base: &QueryParams, overrides: &QueryParams) -> QueryParams {
    let mut merged: QueryParams =
        base.iter().filter(|(k, _)| !overrides.iter().any(|(ok, _)| ok == k)).cloned().collect();
    merged.extend(overrides.iter().cloned());
    merged
}

/// Check the API envelope and decode the body
///
/// An `error` object aborts the caller; `warnings` are logged and ignored.
pub fn decode<T: DeserializeOwned>(site: &str, body: Value) -> Result<T> {
    if let Some(error) = body.get("error") {
        let code = error.get("code").and_then(Value::as_str).unwrap_or("unknown").to_string();
        let info = error
            .get("info")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ScrapeError::Api { site: site.to_string(), code, info });
    }

    if let Some(warnings) = body.get("warnings") {
        warn!("API warnings from {}: {}", site, warnings);
    }

    serde_json::from_value(body).map_err(|source| ScrapeError::Malformed { site: site.to_string(), source })
}
