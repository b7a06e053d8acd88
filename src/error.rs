use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::store::BookId;

pub const NO_BOOK_EXISTS: &str = "no book exists";
pub const STORE_UNAVAILABLE: &str = "book store unavailable";

/// Error response type
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for the book endpoints
///
/// Validation and not-found errors are part of the normal API contract and
/// are reported in the body with `200 OK`. Everything else maps to a real
/// HTTP error status.
#[derive(Debug)]
pub enum ApiError {
    /// A required request field was absent or empty
    MissingField(&'static str),
    /// No book with this id
    BookNotFound(BookId),
    /// Request body could not be read
    InvalidBody(BytesRejection),
    /// Request body was not valid JSON for the endpoint
    JsonError(serde_json::Error),
    /// The store never connected at startup
    StoreUnavailable,
    /// Store operation error
    DatabaseError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::MissingField(field) => (
                StatusCode::OK,
                format!("missing required field {}", field),
            ),
            ApiError::BookNotFound(id) => {
                tracing::info!("Book not found with id: {}", id);
                (StatusCode::OK, NO_BOOK_EXISTS.to_string())
            }
            ApiError::InvalidBody(rejection) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", rejection.body_text()),
            ),
            ApiError::JsonError(err) => (
                StatusCode::BAD_REQUEST,
                format!("JSON parse error: {}", err),
            ),
            ApiError::StoreUnavailable => {
                tracing::warn!("Request rejected: book store is not connected");
                (StatusCode::SERVICE_UNAVAILABLE, STORE_UNAVAILABLE.to_string())
            }
            ApiError::DatabaseError(err) => {
                tracing::error!("Book store error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::JsonError(err)
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::InvalidBody(rejection)
    }
}
