/// Camila Product API - Custom error types.
///
/// All errors use `thiserror` for proper error handling without `unwrap()`.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or unparsable client request frame. The message is sent
    /// back to the client verbatim in an error frame.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("product not found: {0}")]
    ProductNotFound(i64),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, format!("invalid request: {}", msg))
            }
            AppError::ProductNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("product not found: {}", id))
            }
            AppError::Catalog(msg) => {
                tracing::error!("Catalog error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Catalog unavailable".to_string(),
                )
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Response serialization failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// Result type alias for convenience.
pub type AppResult<T> = Result<T, AppError>;
