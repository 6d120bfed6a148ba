//! HTTP Endpoints
//!
//! REST API for the assistant. Error bodies use `{"detail": "..."}` so
//! existing web clients keep working.

use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{
        multipart::MultipartError, DefaultBodyLimit, Json, Multipart, Path, Query, Request,
        State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceExt;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use sahayak_config::constants::app;
use sahayak_core::InboundRequest;

use crate::metrics::{metrics_handler, record_request};
use crate::state::AppState;
use crate::ServerError;

/// Multipart field carrying the recording
const AUDIO_FIELD: &str = "audio_file";

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors_origins);
    let body_limit = state.config.storage.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        // System
        .route("/", get(root_info))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        // Pipeline
        .route("/api/process-audio", post(process_audio))
        .route("/api/process-text", post(process_text))
        .route("/api/audio/:filename", get(get_audio))
        .route("/api/cleanup", delete(cleanup))
        // No request timeout: a started stage always runs to completion
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - `*` allows any origin without credentials
/// - Otherwise the listed origins are allowed with credentials
/// - If none of them parse, defaults to localhost:3000
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        tracing::info!("CORS allowing any origin");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let parsed_origins = if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        vec![HeaderValue::from_static("http://localhost:3000")]
    } else {
        parsed_origins
    };

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    // Credentials rule out wildcard headers, so list them
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
}

// =============================================================================
// System
// =============================================================================

async fn root_info() -> Json<serde_json::Value> {
    record_request("root");
    Json(json!({
        "message": app::TITLE,
        "description": app::DESCRIPTION,
        "version": app::VERSION,
        "status": "active",
        "endpoints": {
            "/": "API information",
            "/health": "Health check",
            "/metrics": "Prometheus metrics",
            "/api/process-audio": "Process audio file",
            "/api/process-text": "Process text directly",
            "/api/audio/{filename}": "Get audio file",
            "/api/cleanup": "Clean temporary files"
        }
    }))
}

async fn health_check() -> Json<serde_json::Value> {
    record_request("health");
    Json(json!({
        "status": "healthy",
        "version": app::VERSION
    }))
}

// =============================================================================
// Pipeline
// =============================================================================

/// Response of `/api/process-audio`
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioResponse {
    pub success: bool,
    pub transcription: String,
    pub response: String,
    pub audio_url: String,
}

/// Body of `/api/process-text`
#[derive(Debug, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Response of `/api/process-text`
#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    /// Echo of the submitted text
    pub transcription: String,
    pub response: String,
    pub audio_url: String,
}

fn multipart_error(err: MultipartError) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge("File too large".to_string())
    } else {
        ServerError::InvalidRequest(format!("Invalid multipart payload: {}", err.body_text()))
    }
}

/// First field named `audio_file`, or failing that the first file field
async fn read_audio_field(multipart: &mut Multipart) -> Result<(String, Bytes), ServerError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AUDIO_FIELD) && field.file_name().is_none() {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok((filename, bytes));
    }

    Err(ServerError::InvalidRequest("No audio file provided".to_string()))
}

/// Upload → transcript → reply → reply audio
async fn process_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AudioResponse>, ServerError> {
    record_request("process_audio");

    let (filename, bytes) = read_audio_field(&mut multipart).await?;
    let turn = state
        .pipeline
        .process(InboundRequest::audio(bytes, filename))
        .await?;

    Ok(Json(AudioResponse {
        success: true,
        transcription: turn.user_text().to_string(),
        response: turn.reply_text().to_string(),
        audio_url: turn.audio().url(),
    }))
}

/// Text (e.g. from browser speech recognition) → reply → reply audio
async fn process_text(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<TextResponse>, ServerError> {
    record_request("process_text");

    let turn = state
        .pipeline
        .process(InboundRequest::text(request.text))
        .await?;

    Ok(Json(TextResponse {
        transcription: turn.user_text().to_string(),
        response: turn.reply_text().to_string(),
        audio_url: turn.audio().url(),
    }))
}

/// Stream a synthesized reply from disk
async fn get_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, ServerError> {
    record_request("get_audio");

    let not_found = || ServerError::NotFound("Audio file not found".to_string());
    let path = state
        .storage()
        .resolve_output(&filename)
        .await
        .ok_or_else(not_found)?;

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(not_found());
    }
    if !status.is_success() && status != StatusCode::NOT_MODIFIED {
        return Err(ServerError::Internal(format!(
            "Internal server error: serving {} returned {}",
            filename, status
        )));
    }

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|_| not_found())?;
    let mut response = response.map(Body::new);
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(sahayak_core::MPEG_CONTENT_TYPE),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok(response)
}

#[derive(Debug, Deserialize)]
struct CleanupQuery {
    /// Only delete files at least this old
    max_age_hours: Option<u64>,
}

/// Delete temporary uploads and replies
async fn cleanup(
    State(state): State<AppState>,
    Query(query): Query<CleanupQuery>,
) -> Result<Json<serde_json::Value>, ServerError> {
    record_request("cleanup");

    let storage = state.storage();
    let result = match query.max_age_hours {
        Some(hours) => {
            storage
                .cleanup_older_than(Duration::from_secs(hours.saturating_mul(3600)))
                .await
        }
        None => storage.cleanup().await,
    };
    let report = result.map_err(|e| ServerError::Internal(format!("Cleanup failed: {}", e)))?;

    Ok(Json(json!({
        "message": "Files cleaned up successfully",
        "uploads_deleted": report.uploads_deleted,
        "outputs_deleted": report.outputs_deleted
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_variants() {
        let _ = build_cors_layer(&["*".to_string()]);
        let _ = build_cors_layer(&[]);
        let _ = build_cors_layer(&["http://localhost:5173".to_string()]);
        let _ = build_cors_layer(&["not a\nheader".to_string()]);
    }
}
