//! Error types for the Q&A pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
///
/// Note: an empty document and an empty index are not errors. They surface
/// as [`crate::types::IngestStatus::Empty`] and a fixed "no document" answer
/// respectively.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text extraction failed (unreadable or corrupt file)
    #[error("Failed to extract text from '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// Embedding provider unreachable or returned malformed output
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Language model call failed
    #[error("Answer generation failed: {0}")]
    Answer(String),

    /// A second ingest was issued while one is already running
    #[error("An ingest is already in progress")]
    IngestBusy,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an answer generation error
    pub fn answer(message: impl Into<String>) -> Self {
        Self::Answer(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::Extraction { filename, message } => (
                StatusCode::BAD_REQUEST,
                "extraction_error",
                format!("Failed to extract text from '{}': {}", filename, message),
            ),
            Error::Embedding(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "embedding_error",
                msg.clone(),
            ),
            Error::Answer(msg) => (StatusCode::SERVICE_UNAVAILABLE, "answer_error", msg.clone()),
            Error::IngestBusy => (
                StatusCode::CONFLICT,
                "ingest_busy",
                "An ingest is already in progress".to_string(),
            ),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
