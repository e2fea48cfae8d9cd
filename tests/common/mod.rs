//! Common test utilities for E2E tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use donation_hub::{AppState, config};
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-search-key";
pub const ENGINE_ID: &str = "test-engine";
pub const ALERTS_TOKEN: &str = "test-alerts-token";
pub const JAR_PREFIX: &str = "https://send.monobank.ua/jar";

pub const TEST_REGIONS: &[&str] = &[
    "Київська область",
    "Львівська область",
    "Одеська область",
    "Харківська область",
];

/// Jar URL used in fixtures
pub fn jar(id: &str) -> String {
    format!("{JAR_PREFIX}/{id}")
}

/// A result page that links to `jar_url`
pub fn page_with_jar(jar_url: &str) -> String {
    format!(
        r#"<html><body>
  <h1>Збираємо на дрон</h1>
  <p>Будь-яка сума важлива.</p>
  <a href="https://t.me/some_channel">Telegram</a>
  <a href="{jar_url}">Банка</a>
</body></html>"#
    )
}

/// A result page without any jar link
pub fn page_without_jar() -> String {
    r#"<html><body><a href="https://example.com/">nothing here</a></body></html>"#.to_string()
}

#[derive(Clone, Default)]
struct UpstreamState {
    search_status: Arc<Mutex<Option<StatusCode>>>,
    search_items: Arc<Mutex<Vec<serde_json::Value>>>,
    last_query: Arc<Mutex<Option<HashMap<String, String>>>>,
    alerts_status: Arc<Mutex<Option<StatusCode>>>,
    alerts: Arc<Mutex<Vec<serde_json::Value>>>,
    pages: Arc<Mutex<HashMap<String, String>>>,
    search_hits: Arc<AtomicUsize>,
    alerts_hits: Arc<AtomicUsize>,
    page_hits: Arc<AtomicUsize>,
    page_delay: Arc<Mutex<Option<Duration>>>,
    pages_in_flight: Arc<AtomicUsize>,
    peak_pages_in_flight: Arc<AtomicUsize>,
}

/// Stub for the search API, result pages and alerts API
pub struct Upstream {
    pub addr: String,
    state: UpstreamState,
}

impl Upstream {
    pub async fn start() -> Self {
        let state = UpstreamState::default();

        let app = Router::new()
            .route("/customsearch/v1", get(stub_search))
            .route("/v1/alerts/active.json", get(stub_alerts))
            .route("/pages/:id", get(stub_page))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn search_endpoint(&self) -> String {
        format!("{}/customsearch/v1", self.addr)
    }

    pub fn alerts_endpoint(&self) -> String {
        format!("{}/v1/alerts/active.json", self.addr)
    }

    pub fn page_url(&self, id: &str) -> String {
        format!("{}/pages/{}", self.addr, id)
    }

    /// Serve `html` at `/pages/{id}`
    pub fn set_page(&self, id: &str, html: String) {
        self.state.pages.lock().unwrap().insert(id.to_string(), html);
    }

    /// Replace search results with (link, title, snippet) triples
    pub fn set_search_items(&self, items: &[(String, String, String)]) {
        let items = items
            .iter()
            .map(|(link, title, snippet)| json!({"link": link, "title": title, "snippet": snippet}))
            .collect();
        *self.state.search_items.lock().unwrap() = items;
    }

    /// Hold every page response for `delay`
    pub fn delay_pages(&self, delay: Duration) {
        *self.state.page_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_search(&self, status: StatusCode) {
        *self.state.search_status.lock().unwrap() = Some(status);
    }

    /// Replace active alerts with (location_title, alert_type) pairs
    pub fn set_alerts(&self, alerts: &[(&str, &str)]) {
        let alerts = alerts
            .iter()
            .enumerate()
            .map(|(id, (location, alert_type))| {
                json!({
                    "id": id,
                    "location_title": location,
                    "location_type": "oblast",
                    "started_at": "2024-03-01 06:12:00",
                    "finished_at": null,
                    "updated_at": "2024-03-01T06:12:00.000Z",
                    "alert_type": alert_type,
                    "location_oblast": location,
                    "location_uid": "14",
                    "notes": null,
                    "calculated": false
                })
            })
            .collect();
        *self.state.alerts.lock().unwrap() = alerts;
    }

    pub fn fail_alerts(&self, status: StatusCode) {
        *self.state.alerts_status.lock().unwrap() = Some(status);
    }

    pub fn last_search_param(&self, name: &str) -> Option<String> {
        self.state
            .last_query
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|params| params.get(name).cloned())
    }

    pub fn search_hits(&self) -> usize {
        self.state.search_hits.load(Ordering::SeqCst)
    }

    pub fn alerts_hits(&self) -> usize {
        self.state.alerts_hits.load(Ordering::SeqCst)
    }

    pub fn page_hits(&self) -> usize {
        self.state.page_hits.load(Ordering::SeqCst)
    }

    /// Most page requests ever served at the same time
    pub fn peak_pages_in_flight(&self) -> usize {
        self.state.peak_pages_in_flight.load(Ordering::SeqCst)
    }
}

async fn stub_search(
    State(state): State<UpstreamState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.search_hits.fetch_add(1, Ordering::SeqCst);
    *state.last_query.lock().unwrap() = Some(params.clone());

    if let Some(status) = *state.search_status.lock().unwrap() {
        return (status, Json(json!({"error": {"code": status.as_u16()}}))).into_response();
    }

    if params.get("key").map(String::as_str) != Some(API_KEY)
        || params.get("cx").map(String::as_str) != Some(ENGINE_ID)
    {
        return StatusCode::FORBIDDEN.into_response();
    }

    let items = state.search_items.lock().unwrap().clone();
    if items.is_empty() {
        // The real API omits `items` when nothing matches
        return Json(json!({})).into_response();
    }
    Json(json!({ "items": items })).into_response()
}

async fn stub_alerts(State(state): State<UpstreamState>, headers: HeaderMap) -> Response {
    state.alerts_hits.fetch_add(1, Ordering::SeqCst);

    if let Some(status) = *state.alerts_status.lock().unwrap() {
        return status.into_response();
    }

    let expected = format!("Bearer {ALERTS_TOKEN}");
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == expected)
        .unwrap_or(false);
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let alerts = state.alerts.lock().unwrap().clone();
    Json(json!({
        "alerts": alerts,
        "meta": {"last_updated_at": "2024/03/01 06:12:00 +0000", "type": "full"},
        "disclaimer": "test"
    }))
    .into_response()
}

async fn stub_page(State(state): State<UpstreamState>, Path(id): Path<String>) -> Response {
    state.page_hits.fetch_add(1, Ordering::SeqCst);

    let in_flight = state.pages_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state
        .peak_pages_in_flight
        .fetch_max(in_flight, Ordering::SeqCst);

    let delay = *state.page_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let html = state.pages.lock().unwrap().get(&id).cloned();
    state.pages_in_flight.fetch_sub(1, Ordering::SeqCst);

    match html {
        Some(html) => Html(html).into_response(),
        None => (StatusCode::NOT_FOUND, Html("<h1>Not found</h1>")).into_response(),
    }
}

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
    pub upstream: Upstream,
}

impl TestServer {
    /// Create a new test server instance backed by a fresh stub upstream
    pub async fn new() -> Self {
        let upstream = Upstream::start().await;

        // Create temporary directory for test database and region list
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let regions_path = temp_dir.path().join("regions.json");
        std::fs::write(
            &regions_path,
            serde_json::to_string(&json!({ "regions": TEST_REGIONS })).unwrap(),
        )
        .unwrap();

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            database: config::DatabaseConfig { path: db_path },
            http: config::HttpClientConfig {
                user_agent: "DonationHub/test".to_string(),
                timeout_seconds: 10,
            },
            search: config::SearchConfig {
                api_key: API_KEY.to_string(),
                engine_id: ENGINE_ID.to_string(),
                endpoint: upstream.search_endpoint(),
                query_prefix: "Збір на ".to_string(),
                result_count: 10,
                max_posts: 6,
                max_concurrent_fetches: 5,
                jar_prefix: JAR_PREFIX.to_string(),
            },
            alerts: config::AlertsConfig {
                api_token: ALERTS_TOKEN.to_string(),
                endpoint: upstream.alerts_endpoint(),
                regions_file: regions_path,
                region_suffix: "область".to_string(),
                source_url: "https://alerts.in.ua/".to_string(),
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };
        config.validate().unwrap();

        // Initialize app state
        let state = AppState::new(&config).await.unwrap();

        // Redirects are asserted on, not followed
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = donation_hub::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
            upstream,
        }
    }

    /// Get base URL for requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// GET a page and return (status, body)
    pub async fn get_page(&self, path: &str) -> (u16, String) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.text().await.unwrap())
    }

    /// POST a form and return the raw response
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Submit a search from the home page and return the rendered body
    pub async fn search(&self, query: &str) -> String {
        let response = self.post_form("/", &[("query", query)]).await;
        assert_eq!(response.status(), 200);
        response.text().await.unwrap()
    }

    /// Insert a donation post directly
    pub async fn seed_donation(&self, title: &str, source: &str) {
        use donation_hub::data::NewPost;

        self.state
            .db
            .insert_donation_post(&NewPost::new(title, "seeded", source))
            .await
            .unwrap();
    }

    /// Serve one jar page per id and return matching search items
    pub fn jar_results(&self, ids: &[&str]) -> Vec<(String, String, String)> {
        ids.iter()
            .map(|id| {
                self.upstream.set_page(id, page_with_jar(&jar(id)));
                (
                    self.upstream.page_url(id),
                    format!("Збір {id}"),
                    format!("Опис збору {id}"),
                )
            })
            .collect()
    }
}
