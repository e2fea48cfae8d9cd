//! Web layer
//!
//! Server-rendered pages:
//! - Home (donation listing + search trigger)
//! - Alerts (region status + render trigger)
//! - Foundations, About (static)
//! - Metrics (Prometheus)

mod alerts;
mod home;
mod info;
mod layout;
mod metrics;
mod pagination;

use axum::{
    Router,
    response::Redirect,
    routing::get,
};

use crate::AppState;

/// Create the page router
///
/// Routes:
/// - GET/POST /
/// - GET/POST /alerts/
/// - GET /foundations/
/// - GET /about/
/// - GET /metrics
///
/// Slash-less paths redirect to their canonical form.
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home).post(home::home_submit))
        .route(
            "/alerts/",
            get(alerts::alerts_page).post(alerts::alerts_submit),
        )
        .route("/foundations/", get(info::foundations))
        .route("/about/", get(info::about))
        .route("/metrics", get(metrics::metrics))
        .route("/alerts", get(|| async { Redirect::permanent("/alerts/") }))
        .route(
            "/foundations",
            get(|| async { Redirect::permanent("/foundations/") }),
        )
        .route("/about", get(|| async { Redirect::permanent("/about/") }))
}
