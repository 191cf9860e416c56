//! # Error Handling Module
//!
//! This module provides the error handling for all three micromart services
//! using the `thiserror` crate. It defines the error taxonomy shared by the
//! gateway and the backend services and maps each error onto the HTTP status
//! code and structured JSON body that clients observe.
//!
//! ## Error taxonomy
//!
//! - `Validation` - missing/invalid required field (400)
//! - `NotFound` - unknown record id (404)
//! - `Conflict` - duplicate unique field, e.g. user email (409)
//! - `InsufficientStock` - stock delta would drive stock negative (400)
//! - `Upstream` - forwarded call failed; mirrors the upstream status or 503
//! - `Internal` - unexpected fault in gateway/service logic (500)
//! - `Configuration` - invalid environment configuration (startup only)
//!
//! Every error response body carries a stable `error` key plus contextual
//! fields; internals (stack traces, identifiers) never leak to the client.

use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

/// Main result type used throughout the crate
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error types shared by the gateway and the backend services
///
/// Each variant carries exactly the context its response body needs. The
/// `#[error("...")]` attribute from `thiserror` implements `Display`, which
/// is what ends up in logs; the client-facing body comes from
/// [`ServiceError::error_body`].
#[derive(Debug, Error, Clone)]
pub enum ServiceError {
    /// A required field is missing or has an invalid value
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// No record with the requested id exists in the collection
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// A unique field (user email) is already taken
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// A stock adjustment would drive the stock count below zero
    #[error("insufficient stock: have {current_stock}, requested change {requested_change}")]
    InsufficientStock {
        current_stock: u32,
        requested_change: i64,
    },

    /// A forwarded call to a backend service failed
    ///
    /// `status` is present when the upstream answered with a non-success
    /// code (which is then mirrored to the client) and absent on connection
    /// errors and timeouts (reported as 503).
    #[error("{service} unavailable: {details}")]
    Upstream {
        service: &'static str,
        status: Option<StatusCode>,
        details: String,
    },

    /// Unexpected fault in the service's own logic
    #[error("internal error: {message}")]
    Internal { message: String },

    /// Invalid environment configuration, detected at startup
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl ServiceError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error for a record id
    pub fn not_found<S: Into<String>>(resource: &'static str, id: S) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a conflict error with a custom message
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an upstream error from a forwarded-call failure
    pub fn upstream<S: Into<String>>(
        service: &'static str,
        status: Option<StatusCode>,
        details: S,
    ) -> Self {
        Self::Upstream {
            service,
            status,
            details: details.into(),
        }
    }

    /// Create an internal error with a custom message
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// Upstream errors mirror the status the upstream reported when there is
    /// one; a call that never produced a response maps to 503.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => status.unwrap_or(StatusCode::SERVICE_UNAVAILABLE),
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the client-facing JSON body for this error
    ///
    /// Bodies follow the `{error, message?, ...context}` convention; the
    /// `error` key is always present and its wording is part of the API.
    pub fn error_body(&self) -> Value {
        match self {
            Self::Validation { message } => json!({
                "error": "Validation failed",
                "message": message,
            }),
            Self::NotFound { resource, id } => json!({
                "error": format!("{resource} not found"),
                "id": id,
            }),
            Self::Conflict { message } => json!({
                "error": "Conflict",
                "message": message,
            }),
            Self::InsufficientStock {
                current_stock,
                requested_change,
            } => json!({
                "error": "Insufficient stock",
                "currentStock": current_stock,
                "requestedChange": requested_change,
            }),
            Self::Upstream {
                service, details, ..
            } => json!({
                "error": format!("{service} unavailable"),
                "details": details,
            }),
            Self::Internal { message } | Self::Configuration { message } => json!({
                "error": "Internal Server Error",
                "message": message,
            }),
        }
    }
}

/// Convert errors into HTTP responses automatically
///
/// Handlers return `ServiceResult<T>` and axum turns the `Err` arm into a
/// proper response through this impl.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.error_body())).into_response()
    }
}

/// Fallback handler shared by all three services
///
/// Unmatched routes answer with the standard structured 404 body instead of
/// axum's empty default.
pub async fn route_not_found(method: Method, uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": format!("Route {} {} not found", method, uri.path()),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ServiceError::validation("Name and email are required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::not_found("User", "42").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::conflict("User with this email already exists").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::InsufficientStock {
                current_stock: 3,
                requested_change: -5,
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_error_mirrors_reported_status() {
        let with_status =
            ServiceError::upstream("User service", Some(StatusCode::NOT_FOUND), "404");
        assert_eq!(with_status.status_code(), StatusCode::NOT_FOUND);

        let without_status = ServiceError::upstream("User service", None, "connection refused");
        assert_eq!(
            without_status.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_body_shape() {
        let body = ServiceError::validation("Name and email are required").error_body();
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["message"], "Name and email are required");
    }

    #[test]
    fn test_not_found_body_carries_id() {
        let body = ServiceError::not_found("Product", "abc-123").error_body();
        assert_eq!(body["error"], "Product not found");
        assert_eq!(body["id"], "abc-123");
    }

    #[test]
    fn test_insufficient_stock_body_context() {
        let body = ServiceError::InsufficientStock {
            current_stock: 2,
            requested_change: -10,
        }
        .error_body();
        assert_eq!(body["error"], "Insufficient stock");
        assert_eq!(body["currentStock"], 2);
        assert_eq!(body["requestedChange"], -10);
    }

    #[test]
    fn test_upstream_body_names_the_service() {
        let body = ServiceError::upstream("Product service", None, "connect timeout").error_body();
        assert_eq!(body["error"], "Product service unavailable");
        assert_eq!(body["details"], "connect timeout");
    }
}
