//! Sahayak Server
//!
//! HTTP API for the Hindi voice assistant: audio and text turns, reply audio
//! download, storage cleanup, health and metrics.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_error, record_request};
pub use state::AppState;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sahayak_pipeline::PipelineError;
use serde_json::json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Pipeline(err) => match err {
                PipelineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                PipelineError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                // Usually quota exhaustion upstream
                PipelineError::TranscriptionFailed(_) => StatusCode::TOO_MANY_REQUESTS,
                PipelineError::GenerationFailed(_)
                | PipelineError::SynthesisFailed(_)
                | PipelineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label for the error counter
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::InvalidRequest(_) => "invalid_request",
            ServerError::PayloadTooLarge(_) => "payload_too_large",
            ServerError::NotFound(_) => "not_found",
            ServerError::Pipeline(err) => err.kind(),
            ServerError::Internal(_) => "internal",
        }
    }

    /// Message returned to the client
    fn detail(&self) -> String {
        match self {
            ServerError::Pipeline(PipelineError::Storage(msg)) => {
                format!("Internal server error: {}", msg)
            }
            other => other.to_string(),
        }
    }
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        err.status()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        record_error(self.kind());

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sahayak_core::{GenerationError, SynthesisError, TranscriptionError};

    #[test]
    fn test_pipeline_status_mapping() {
        let cases = [
            (
                PipelineError::InvalidInput("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                PipelineError::PayloadTooLarge { size: 2, limit: 1 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                PipelineError::TranscriptionFailed(TranscriptionError::Empty),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                PipelineError::GenerationFailed(GenerationError::Empty),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PipelineError::SynthesisFailed(SynthesisError::EmptyText),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PipelineError::Storage("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status(), status);
        }
    }

    #[test]
    fn test_detail_messages() {
        let err = ServerError::from(PipelineError::TranscriptionFailed(
            TranscriptionError::Remote("429".into()),
        ));
        assert!(err.detail().starts_with("Failed to transcribe audio."));

        let err = ServerError::from(PipelineError::Storage("disk full".into()));
        assert_eq!(err.detail(), "Internal server error: disk full");

        let err = ServerError::NotFound("Audio file not found".into());
        assert_eq!(err.detail(), "Audio file not found");
    }
}
