//! Response envelope and error mapping shared by all handlers

mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError<T>>;

pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) | DomainError::InvalidState(_) => StatusCode::CONFLICT,
        DomainError::InvalidVehicleType(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
    }
}

/// Convert a domain error into an HTTP status and error envelope.
pub fn domain_error<T>(error: DomainError) -> ApiError<T> {
    (status_for(&error), Json(ApiResponse::error(error.to_string())))
}
