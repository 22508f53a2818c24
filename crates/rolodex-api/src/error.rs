//! Unified error type for the API surface.
//!
//! Every handler returns `Result<T, ApiError>`; the `IntoResponse` impl
//! renders the failure envelope (`{"errors": ...}`) so all failures share
//! one wire shape: an array of messages for field validation, a single
//! string for everything else.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Field-level validation failures, one message per violated field.
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    /// Domain-level rejection with a single client-facing message.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing, unknown, or stale session token.
    #[error("unauthorized")]
    Unauthorized,

    /// Target did not resolve for the caller. Ownership mismatches use this
    /// variant too, so other users' resources are indistinguishable from
    /// missing ones.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage or runtime failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(anyhow::anyhow!("blocking task failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let errors = match self {
            Self::Validation(messages) => json!(messages),
            Self::BadRequest(message) => json!(message),
            Self::Unauthorized => json!("Unauthorized"),
            Self::NotFound(message) => json!(message),
            Self::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                json!("Internal Server Error")
            }
        };

        (status, Json(json!({ "errors": errors }))).into_response()
    }
}
