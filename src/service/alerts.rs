//! Alert renderer
//!
//! Turns a region name into alert posts, replacing whatever was stored before.

use std::sync::Arc;

use chrono::Local;

use crate::config::AlertsConfig;
use crate::data::{Database, NewPost, RegionCatalog};
use crate::error::AppError;
use crate::integrations::{ActiveAlert, AlertsApiClient};
use crate::metrics::ALERT_RENDERS_TOTAL;

/// Title stored on every alert post
pub const ALERT_POST_TITLE: &str = "Мапа тривог України";

/// Content of the post stored for an unknown region
pub const INVALID_REGION_MESSAGE: &str = "❌Невірна область❌";

/// Content of the post stored when the alerts API is unavailable
pub const ALERTS_UNAVAILABLE_MESSAGE: &str = "⚠️Не вдалося отримати дані про тривоги⚠️";

/// `HH:MM:SS dd.mm.YYYY`
const TIMESTAMP_FORMAT: &str = "%H:%M:%S %d.%m.%Y";

/// Display text per alert-type code
const ALERT_TYPE_LABELS: &[(&str, &str)] = &[
    ("air_raid", "🚨Повітряна тривога🚨"),
    ("artillery_shelling", "💣Загроза артобстрілу💣"),
    ("urban_fights", "⚔️Загроза вуличних боїв⚔️"),
    ("chemical", "⚠️Хімічна загроза⚠️"),
    ("nuclear", "☢️Радіаційна загроза☢️"),
];

/// Result of one render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// One post per matching active alert
    Rendered { count: usize },
    /// Valid region without active alerts
    NoActiveAlerts,
    /// Region not in the catalog; the API was not called
    InvalidRegion,
    /// Alerts API call failed
    Failed { reason: String },
}

impl AlertOutcome {
    fn label(&self) -> &'static str {
        match self {
            AlertOutcome::Rendered { .. } => "rendered",
            AlertOutcome::NoActiveAlerts => "no_active_alerts",
            AlertOutcome::InvalidRegion => "invalid_region",
            AlertOutcome::Failed { .. } => "failed",
        }
    }
}

/// Capitalize and append the region suffix when missing
///
/// Blank input yields `None`.
pub fn normalize_region(input: &str, suffix: &str) -> Option<String> {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;

    let mut region: String = first.to_uppercase().collect();
    region.extend(chars.flat_map(char::to_lowercase));

    if !region.contains(suffix) {
        region.push(' ');
        region.push_str(suffix);
    }

    Some(region)
}

/// Display text for an alert-type code, falling back to the code itself
pub fn translate_alert_type(code: &str) -> &str {
    ALERT_TYPE_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}

/// Alert renderer service
pub struct AlertRenderer {
    db: Arc<Database>,
    alerts_api: AlertsApiClient,
    regions: Arc<RegionCatalog>,
    settings: AlertsConfig,
}

impl AlertRenderer {
    pub fn new(
        db: Arc<Database>,
        alerts_api: AlertsApiClient,
        regions: Arc<RegionCatalog>,
        settings: AlertsConfig,
    ) -> Self {
        Self {
            db,
            alerts_api,
            regions,
            settings,
        }
    }

    /// Render alert posts for `region_input`
    ///
    /// Always replaces the stored alert posts, whatever the outcome.
    pub async fn render(&self, region_input: Option<&str>) -> Result<AlertOutcome, AppError> {
        let region = region_input
            .and_then(|input| normalize_region(input, &self.settings.region_suffix))
            .filter(|region| self.regions.contains(region));

        let Some(region) = region else {
            tracing::info!(input = ?region_input, "Rejected unknown region");
            self.store(&[INVALID_REGION_MESSAGE.to_string()]).await?;
            return Ok(self.finish(AlertOutcome::InvalidRegion));
        };

        let active = match self.alerts_api.active_alerts().await {
            Ok(active) => active,
            Err(error) => {
                tracing::error!(%error, region = %region, "Alerts API call failed");
                self.store(&[ALERTS_UNAVAILABLE_MESSAGE.to_string()]).await?;
                return Ok(self.finish(AlertOutcome::Failed {
                    reason: error.to_string(),
                }));
            }
        };

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let contents = alert_messages(&region, &active, &timestamp);

        tracing::info!(
            region = %region,
            active_total = active.len(),
            matching = contents.len(),
            "Active alerts filtered"
        );

        if contents.is_empty() {
            let message = format!("{region}: Наразі немає повітряної тривоги ({timestamp})");
            self.store(&[message]).await?;
            return Ok(self.finish(AlertOutcome::NoActiveAlerts));
        }

        self.store(&contents).await?;
        Ok(self.finish(AlertOutcome::Rendered {
            count: contents.len(),
        }))
    }

    async fn store(&self, contents: &[String]) -> Result<(), AppError> {
        let posts: Vec<NewPost> = contents
            .iter()
            .map(|content| NewPost::new(ALERT_POST_TITLE, content, &self.settings.source_url))
            .collect();

        self.db.replace_alert_posts(&posts).await?;
        Ok(())
    }

    fn finish(&self, outcome: AlertOutcome) -> AlertOutcome {
        ALERT_RENDERS_TOTAL
            .with_label_values(&[outcome.label()])
            .inc();
        outcome
    }
}

/// One message per alert located in `region` (case-insensitive)
fn alert_messages(region: &str, active: &[ActiveAlert], timestamp: &str) -> Vec<String> {
    let region = region.to_lowercase();

    active
        .iter()
        .filter(|alert| alert.location_title.to_lowercase() == region)
        .map(|alert| {
            format!(
                "{}: {} ({})",
                alert.location_title,
                translate_alert_type(&alert.alert_type),
                timestamp
            )
        })
        .collect()
}
