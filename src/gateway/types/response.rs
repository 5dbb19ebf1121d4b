//! API response types
//!
//! - `ApiResponse<T>`: unified success wrapper
//! - `ApiError`: HTTP-ready error with a stable string code and optional
//!   structured details
//! - `ApiResult<T>`: handler return type

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::listings::ListingError;

/// Unified API response wrapper
///
/// All success responses follow this structure:
/// - code: 0
/// - msg: short message description
/// - data: actual payload
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

/// Error payload carried in the response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Stable error code (VALIDATION_ERROR, VERSION_CONFLICT, ...)
    #[schema(example = "VERSION_CONFLICT")]
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// HTTP-ready API error
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: ErrorDetail {
                    code: code.into(),
                    message: message.into(),
                    details: None,
                },
            },
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.body.error.details = Some(details);
        self
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ListingError> for ApiError {
    fn from(e: ListingError) -> Self {
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let details = match &e {
            ListingError::InvalidTransition { from, to, allowed } => Some(json!({
                "from": from,
                "to": to,
                "allowed": allowed,
            })),
            ListingError::VersionConflict { current, attempted } => Some(json!({
                "currentVersion": current,
                "attemptedVersion": attempted,
            })),
            ListingError::NotArchived { ids } => Some(json!({ "ids": ids })),
            ListingError::BatchNotFound { missing } => Some(json!({ "missing": missing })),
            _ => None,
        };

        // Storage details stay in the log, not on the wire
        let message = match &e {
            ListingError::Storage(inner) => {
                tracing::error!(error = %inner, "storage failure");
                "Internal storage error".to_string()
            }
            other => other.to_string(),
        };

        let mut err = ApiError::new(status, e.code(), message);
        if let Some(details) = details {
            err = err.with_details(details);
        }
        err
    }
}

/// Handler result: enveloped success or an HTTP-ready error
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 OK success response
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 Created success response
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}
