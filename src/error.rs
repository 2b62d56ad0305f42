use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The application-wide error taxonomy. Every failure a handler or middleware
/// can surface to a client maps onto exactly one of these variants, and each
/// variant maps onto exactly one HTTP status. The response body is always
/// `{ "message": string }` so the SPA can render errors uniformly.
///
/// Upstream provider errors (identity, database, mail gateway) are translated
/// into a client-safe message at the boundary; provider internals are logged
/// server-side but never leak into the response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input, detected before any external call. 400.
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid, or expired credentials. 401.
    #[error("{0}")]
    Unauthenticated(String),

    /// Valid identity, but the role or ownership check failed. 403.
    #[error("{0}")]
    Forbidden(String),

    /// The addressed resource does not exist (or is not visible). 404.
    #[error("{0}")]
    NotFound(String),

    /// An external dependency failed mid-request. 500, generic message.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// The HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
