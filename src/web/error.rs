use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;

/// Error taxonomy for every API failure path. One serialization
/// contract: the status code plus a `{"message": "..."}` JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Store failures get logged with their full chain; the client
        // only ever sees the generic message.
        if let Self::Internal(e) = &self {
            tracing::error!("Request failed: {e:#}");
        }

        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingScope(_) => Self::Forbidden(e.to_string()),
            AuthError::FetchKeys(_) => Self::Internal(e.into()),
            AuthError::MissingToken
            | AuthError::InvalidToken(_)
            | AuthError::MissingKeyId
            | AuthError::UnknownKey(_) => Self::Unauthorized(e.to_string()),
        }
    }
}
