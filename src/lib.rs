//! Donation Hub - fundraiser discovery and air-raid alert pages
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Web Layer (Axum)                        │
//! │  - Server-rendered pages                                    │
//! │  - Health and metrics endpoints                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Search pipeline (search API + page scans)                │
//! │  - Alert renderer (alerts API)                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │          Data Layer          │         Integrations         │
//! │  - SQLite (sqlx)             │  - Custom Search API         │
//! │  - Region catalog            │  - alerts.in.ua API          │
//! │                              │  - Page fetch + link scan    │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `web`: HTTP handlers and HTML rendering
//! - `service`: Search pipeline and alert renderer
//! - `integrations`: Upstream API clients
//! - `data`: Database and region catalog
//! - `config`: Configuration management
//! - `error`: Error types

pub mod config;
pub mod data;
pub mod error;
pub mod integrations;
pub mod metrics;
pub mod service;
pub mod web;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like the database pool and services.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: Arc<data::Database>,

    /// Search-and-filter pipeline
    pub search: Arc<service::SearchPipeline>,

    /// Alert renderer
    pub alerts: Arc<service::AlertRenderer>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to SQLite database
    /// 2. Load region catalog
    /// 3. Build HTTP client
    /// 4. Wire services
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: &config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Connect to SQLite database
        let db = Arc::new(data::Database::connect(&config.database.path).await?);
        tracing::info!("Database connected");

        // 2. Load region catalog
        let regions = Arc::new(data::RegionCatalog::load(&config.alerts.regions_file)?);
        if regions.is_empty() {
            tracing::warn!(
                path = %config.alerts.regions_file.display(),
                "Region catalog is empty; every alert request will be rejected"
            );
        }
        tracing::info!(regions = regions.len(), "Region catalog loaded");

        // 3. Initialize HTTP client
        let http_client = reqwest::Client::builder()
            .user_agent(config.http.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.http.timeout_seconds))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;
        let http_client = Arc::new(http_client);

        // 4. Wire services
        let search = service::SearchPipeline::new(
            db.clone(),
            integrations::SearchApiClient::new(http_client.clone(), &config.search),
            http_client.clone(),
            config.search.clone(),
        );
        let alerts = service::AlertRenderer::new(
            db.clone(),
            integrations::AlertsApiClient::new(http_client.clone(), &config.alerts),
            regions,
            config.alerts.clone(),
        );

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            db,
            search: Arc::new(search),
            alerts: Arc::new(alerts),
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(web::pages_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
