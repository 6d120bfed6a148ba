//! Prometheus metrics recorder and `/metrics` endpoint handler

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::state::AppState;
use crate::ServerError;

/// HTTP requests total (counter, labels: endpoint)
pub const REQUESTS_TOTAL: &str = "sahayak_requests_total";
/// Failed requests total (counter, labels: kind)
pub const ERRORS_TOTAL: &str = "sahayak_errors_total";

/// Install the global Prometheus recorder
///
/// Call once at startup, before anything is recorded.
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Internal(format!("failed to install metrics recorder: {}", e)))?;
    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

pub fn record_request(endpoint: &'static str) {
    ::metrics::counter!(REQUESTS_TOTAL, "endpoint" => endpoint).increment(1);
}

pub fn record_error(kind: &'static str) {
    ::metrics::counter!(ERRORS_TOTAL, "kind" => kind).increment(1);
}

/// Render Prometheus text format, or 404 when metrics are disabled
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics disabled").into_response(),
    }
}
