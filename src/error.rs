//! Error types for the string analyzer service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types surfaced at the request boundary
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Input present but of the wrong type
    #[error("{0}")]
    InvalidType(String),

    /// Content already stored
    #[error("{0}")]
    Conflict(String),

    /// No matching record
    #[error("{0}")]
    NotFound(String),

    /// Natural-language query matched no rule
    #[error("Unable to parse natural language query: {0}")]
    UnparseableQuery(String),

    /// Document store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::UnparseableQuery(_) => StatusCode::BAD_REQUEST,
            Error::InvalidType(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Store(_) | Error::Config(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            Error::UnparseableQuery(_) => "Unable to parse natural language query".to_string(),
            _ if status.is_server_error() => {
                error!(error = %self, "Request failed");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidType("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(Error::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(Error::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::UnparseableQuery("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Store(StoreError::QueryFailed("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let response =
            Error::Store(StoreError::ConnectionFailed("secret-host:27017".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }
}
