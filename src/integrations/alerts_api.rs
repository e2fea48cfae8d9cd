//! alerts.in.ua client
//!
//! Fetches the list of currently active alerts with a bearer token.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use crate::config::AlertsConfig;
use crate::error::AppError;

/// An active alert as reported by the API
///
/// Only the fields used for rendering are decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveAlert {
    /// e.g. "Київська область"
    pub location_title: String,
    /// e.g. "air_raid"
    pub alert_type: String,
}

#[derive(Debug, Deserialize)]
struct ActiveAlertsResponse {
    #[serde(default)]
    alerts: Vec<ActiveAlert>,
}

/// Tokened alerts API client
#[derive(Clone)]
pub struct AlertsApiClient {
    http_client: Arc<reqwest::Client>,
    endpoint: String,
    api_token: String,
}

impl AlertsApiClient {
    pub fn new(http_client: Arc<reqwest::Client>, config: &AlertsConfig) -> Self {
        Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
        }
    }

    /// Fetch all currently active alerts
    pub async fn active_alerts(&self) -> Result<Vec<ActiveAlert>, AppError> {
        let started = Instant::now();

        let result = async {
            let response = self
                .http_client
                .get(&self.endpoint)
                .bearer_auth(&self.api_token)
                .send()
                .await?
                .error_for_status()?;

            response.json::<ActiveAlertsResponse>().await
        }
        .await;

        let status = if result.is_ok() { "ok" } else { "error" };
        crate::metrics::observe_external_request("alerts", status, started.elapsed());

        let body = result?;
        tracing::debug!(alerts = body.alerts.len(), "Alerts API responded");
        Ok(body.alerts)
    }
}
