//! Error types for the query pipeline and HTTP layer

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
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or empty batch input; fatal to the whole batch
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The generation backend could not be reached or returned a non-success status
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Model reply did not contain parseable JSON
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    /// Document could not be downloaded
    #[error("Failed to fetch document '{url}': {message}")]
    DocumentFetch { url: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a model unavailable error
    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable(message.into())
    }

    /// Create a document fetch error
    pub fn document_fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentFetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable error kind
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::InvalidInput(_) => "invalid_input",
            Error::ModelUnavailable(_) => "model_unavailable",
            Error::MalformedModelOutput(_) => "malformed_model_output",
            Error::DocumentFetch { .. } => "document_fetch_error",
            Error::Io(_) => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Config(_) | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::DocumentFetch { .. } => StatusCode::BAD_GATEWAY,
            Error::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::MalformedModelOutput(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            },
            "system_metadata": {
                "error_type": if status.is_client_error() { "client_error" } else { "system_error" },
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}
