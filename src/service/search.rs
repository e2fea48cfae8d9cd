//! Search pipeline
//!
//! Turns a user query into donation posts:
//! search API -> concurrent page scans -> in-order inserts, up to a cap.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::config::SearchConfig;
use crate::data::{Database, NewPost};
use crate::error::AppError;
use crate::integrations::{SearchApiClient, SearchItem, scan_page};
use crate::metrics::{DONATION_POSTS_CREATED_TOTAL, PAGE_SCANS_TOTAL, SEARCH_RUNS_TOTAL};

/// Message shown when the search API call fails
pub const SEARCH_FAILED_MESSAGE: &str = "An error occurred while searching.";

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Search succeeded; `created` new donation posts were stored
    Completed { created: usize },
    /// The search API could not be used
    Failed { reason: String },
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Completed { .. })
    }
}

/// Search-and-filter pipeline
pub struct SearchPipeline {
    db: Arc<Database>,
    search_api: SearchApiClient,
    http_client: Arc<reqwest::Client>,
    settings: SearchConfig,
}

impl SearchPipeline {
    pub fn new(
        db: Arc<Database>,
        search_api: SearchApiClient,
        http_client: Arc<reqwest::Client>,
        settings: SearchConfig,
    ) -> Self {
        Self {
            db,
            search_api,
            http_client,
            settings,
        }
    }

    /// Run the pipeline for `query`
    ///
    /// # Steps
    /// 1. Load known donation sources
    /// 2. Query the search API with the configured prefix
    /// 3. Scan unknown result pages concurrently (bounded)
    /// 4. Insert qualifying links in result order until the cap is reached
    ///
    /// # Errors
    /// Only datastore errors are returned; upstream failures become
    /// `SearchOutcome::Failed` or a skipped result.
    pub async fn run(&self, query: &str) -> Result<SearchOutcome, AppError> {
        let mut known = self.db.donation_sources().await?;
        let full_query = format!("{}{}", self.settings.query_prefix, query);

        let items = match self
            .search_api
            .search(&full_query, self.settings.result_count)
            .await
        {
            Ok(items) => items,
            Err(error) => {
                tracing::error!(%error, query = %full_query, "Search API call failed");
                SEARCH_RUNS_TOTAL.with_label_values(&["failed"]).inc();
                return Ok(SearchOutcome::Failed {
                    reason: SEARCH_FAILED_MESSAGE.to_string(),
                });
            }
        };

        tracing::info!(
            query = %full_query,
            results = items.len(),
            known = known.len(),
            "Search API returned results"
        );

        let mut tasks = self.spawn_scans(items, &known);
        let created = self.collect_in_order(&mut tasks, &mut known).await;

        // Anything still running past the cap is not needed
        for (task, _) in &tasks {
            task.abort();
        }

        let created = created?;
        SEARCH_RUNS_TOTAL.with_label_values(&["completed"]).inc();
        tracing::info!(created, total_known = known.len(), "Search pipeline finished");

        Ok(SearchOutcome::Completed { created })
    }

    /// Spawn one fetch+scan task per candidate, bounded by a semaphore
    fn spawn_scans(
        &self,
        items: Vec<SearchItem>,
        known: &HashSet<String>,
    ) -> Vec<(JoinHandle<Option<String>>, SearchItem)> {
        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrent_fetches));
        let mut tasks = Vec::new();

        for item in items {
            if known.len() >= self.settings.max_posts {
                break;
            }

            if known.contains(&item.link) {
                continue;
            }

            if !is_fetchable(&item.link) {
                tracing::debug!(link = %item.link, "Skipping non-http search result");
                continue;
            }

            let semaphore = semaphore.clone();
            let http_client = self.http_client.clone();
            let prefix = self.settings.jar_prefix.clone();
            let link = item.link.clone();

            let task = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;

                match scan_page(&http_client, &link, &prefix).await {
                    Ok(Some(jar)) => {
                        PAGE_SCANS_TOTAL.with_label_values(&["match"]).inc();
                        Some(jar)
                    }
                    Ok(None) => {
                        PAGE_SCANS_TOTAL.with_label_values(&["no_match"]).inc();
                        None
                    }
                    Err(error) => {
                        PAGE_SCANS_TOTAL.with_label_values(&["error"]).inc();
                        tracing::warn!(%error, link = %link, "Failed to check result page");
                        None
                    }
                }
            });

            tasks.push((task, item));
        }

        tasks
    }

    /// Await scans in result order, inserting new qualifying links
    async fn collect_in_order(
        &self,
        tasks: &mut [(JoinHandle<Option<String>>, SearchItem)],
        known: &mut HashSet<String>,
    ) -> Result<usize, AppError> {
        let mut created = 0;

        for (task, item) in tasks.iter_mut() {
            let jar = match task.await {
                Ok(jar) => jar,
                Err(error) => {
                    tracing::warn!(%error, link = %item.link, "Page scan task did not complete");
                    None
                }
            };

            let Some(jar) = jar else {
                continue;
            };

            // Two results can lead to the same jar
            if known.contains(&jar) {
                tracing::debug!(jar = %jar, link = %item.link, "Jar already recorded");
                continue;
            }

            let post = self
                .db
                .insert_donation_post(&NewPost::new(&item.title, &item.snippet, &jar))
                .await?;
            DONATION_POSTS_CREATED_TOTAL.inc();
            tracing::info!(id = post.id, source = %post.source, "Donation post created");

            known.insert(jar);
            created += 1;

            if known.len() >= self.settings.max_posts {
                break;
            }
        }

        Ok(created)
    }
}

fn is_fetchable(link: &str) -> bool {
    url::Url::parse(link)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
