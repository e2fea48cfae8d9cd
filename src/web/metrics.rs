//! `GET /metrics`

use axum::{http::header::CONTENT_TYPE, response::IntoResponse};
use prometheus::{Encoder, TextEncoder};

use crate::error::AppError;
use crate::metrics::REGISTRY;

/// Prometheus text exposition of the application registry
pub async fn metrics() -> Result<impl IntoResponse, AppError> {
    let encoder = TextEncoder::new();
    let body = encoder
        .encode_to_string(&REGISTRY.gather())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode metrics: {e}")))?;

    Ok(([(CONTENT_TYPE, encoder.format_type().to_string())], body))
}
