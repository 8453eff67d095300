//! Unified error handling for the server.
//!
//! Store failures never reach the client in detail: each endpoint answers
//! with its own fixed message and a 500, and the cause goes to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::StoreError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}: {source}")]
    Store {
        /// Client-facing message for the failed endpoint
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Attach the endpoint's client-facing message to a store error.
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { message, source }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Store {
                message,
                source: StoreError::NotFound(id),
            } => {
                tracing::warn!("{}: no user with id {}", message, id);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            AppError::Store { message, source } => {
                tracing::error!("{}: {:?}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_become_generic_500() {
        let err = AppError::store("Failed to update user")(StoreError::NotFound(3));
        assert_eq!(err.to_string(), "Failed to update user: user not found: 3");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response =
            AppError::store("Failed to fetch users")(StoreError::Unavailable).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
