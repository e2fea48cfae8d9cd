//! Custom Search JSON API client
//!
//! `GET {endpoint}?key=&cx=&q=&num=&fields=items(link,title,snippet)`

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::AppError;

/// Restrict the response to the three fields we store
const RESULT_FIELDS: &str = "items(link,title,snippet)";

/// One search hit
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SearchItem {
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Absent when the query has no results
    #[serde(default)]
    items: Vec<SearchItem>,
}

/// Keyed web-search client
#[derive(Clone)]
pub struct SearchApiClient {
    http_client: Arc<reqwest::Client>,
    endpoint: String,
    api_key: String,
    engine_id: String,
}

impl SearchApiClient {
    pub fn new(http_client: Arc<reqwest::Client>, config: &SearchConfig) -> Self {
        Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
        }
    }

    /// Run a query and return at most `num` items
    ///
    /// # Errors
    /// Returns `AppError::HttpClient` on transport failure, non-2xx status,
    /// or an undecodable body
    pub async fn search(&self, query: &str, num: u32) -> Result<Vec<SearchItem>, AppError> {
        let started = Instant::now();
        let num = num.to_string();

        let result = async {
            let response = self
                .http_client
                .get(&self.endpoint)
                .query(&[
                    ("key", self.api_key.as_str()),
                    ("cx", self.engine_id.as_str()),
                    ("q", query),
                    ("num", num.as_str()),
                    ("fields", RESULT_FIELDS),
                ])
                .send()
                .await?
                .error_for_status()?;

            response.json::<SearchResponse>().await
        }
        .await;

        let status = if result.is_ok() { "ok" } else { "error" };
        crate::metrics::observe_external_request("search", status, started.elapsed());

        let body = result?;
        tracing::debug!(query, items = body.items.len(), "Search API responded");
        Ok(body.items)
    }
}
