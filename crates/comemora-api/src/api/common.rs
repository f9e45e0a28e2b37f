// Common DTOs for public API
//
// These types are shared across multiple API endpoints.

use axum::http::StatusCode;
use axum::Json;
use comemora_core::CelebrationError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Convert to axum response tuple
    pub fn into_response(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Response wrapper for list endpoints.
/// All list endpoints return responses wrapped in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    /// Array of items returned by the list operation.
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Map a service error to a status and JSON body.
///
/// Client errors carry their message back. Server errors are logged with
/// `action` and answered with a generic message.
pub fn service_error(action: &str, err: CelebrationError) -> ApiError {
    match err {
        CelebrationError::Validation(_) | CelebrationError::Csv(_) => {
            tracing::warn!("Rejected request to {}: {}", action, err);
            ErrorResponse::new(err.to_string()).into_response(StatusCode::BAD_REQUEST)
        }
        CelebrationError::Cancelled => {
            tracing::warn!("Request to {} cancelled", action);
            ErrorResponse::new("Server is shutting down")
                .into_response(StatusCode::SERVICE_UNAVAILABLE)
        }
        err => {
            tracing::error!("Failed to {}: {}", action, err);
            ErrorResponse::new("Internal server error")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// 404 with a resource-specific message
pub fn not_found(what: &str) -> ApiError {
    ErrorResponse::new(format!("{} not found", what)).into_response(StatusCode::NOT_FOUND)
}
