//! Mapping from core errors to HTTP responses.
//!
//! Client mistakes get a 4xx with detail. Everything else is logged and reported as an opaque
//! 500 so that paths and internal messages never reach the caller.

use api_shared::{ErrorRes, FieldErrorRes};
use axum::{http::StatusCode, response::Json};
use intake_core::{FieldErrors, IntakeError};

pub type ApiError = (StatusCode, Json<ErrorRes>);

/// 400 with one or more field errors.
pub fn validation_error(errors: &FieldErrors) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorRes {
            message: "Validation failed".into(),
            fields: errors
                .iter()
                .map(|e| FieldErrorRes {
                    field: e.field.clone(),
                    reason: e.reason.clone(),
                })
                .collect(),
        }),
    )
}

/// Converts a core error into a response. `context` names the operation in the log line.
pub fn api_error(context: &str, err: IntakeError) -> ApiError {
    match err {
        IntakeError::Validation(errors) => validation_error(&errors),
        IntakeError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorRes::message("Customer not found")),
        ),
        IntakeError::BookingRejected(rejection) => (
            StatusCode::CONFLICT,
            Json(ErrorRes::message(rejection.to_string())),
        ),
        IntakeError::Uuid(e) => validation_error(&FieldErrors::single("client_id", e.to_string())),
        other => {
            tracing::error!("{} error: {:?}", context, other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes::message("Internal error")),
            )
        }
    }
}
