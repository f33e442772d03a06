use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Request-level failures. Every variant names the stage that failed so
/// front ends can render a visible message and operators can tell transient
/// service errors from permanent ones.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("embedding service error: {0}")]
    EmbeddingService(String),
    #[error("completion service error: {0}")]
    CompletionService(String),
    #[error("retrieval index is empty")]
    EmptyIndex,
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("vector store error: {0}")]
    Storage(String),
    #[error("document source error: {0}")]
    DocumentSource(String),
    #[error("access denied")]
    AccessDenied,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::EmbeddingService(_)
            | AppError::CompletionService(_)
            | AppError::Storage(_)
            | AppError::DocumentSource(_) => StatusCode::BAD_GATEWAY,
            AppError::EmptyIndex => StatusCode::SERVICE_UNAVAILABLE,
            AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DimensionMismatch { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Startup-fatal configuration problems. Validation issues are collected and
/// reported in one shot rather than one key at a time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration:\n{}", issues.join("\n"))]
    Invalid { issues: Vec<String> },
}
