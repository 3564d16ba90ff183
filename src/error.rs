use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
}

/// Server-side fault taxonomy. Everything outward is a JSON
/// `{error: {code, message}}` body with a matching status; raw storage
/// errors never reach the client.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Auth(&'static str, String),
    Unauthorized(String),
    NotFound(String),
    Duplicate(String),
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn invalid_password() -> Self {
        ApiError::Auth("INVALID_CREDENTIALS", "Invalid password".into())
    }

    pub fn session_expired() -> Self {
        ApiError::Unauthorized("Session missing or expired".into())
    }

    fn to_error_response(code: &str, message: &str) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            error: ErrorObject {
                code: code.to_string(),
                message: message.to_string(),
            },
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::to_error_response("VALIDATION_ERROR", &msg),
            )
                .into_response(),
            ApiError::Auth(code, msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ApiError::to_error_response("UNAUTHORIZED", &msg),
            )
                .into_response(),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiError::to_error_response("NOT_FOUND", &msg),
            )
                .into_response(),
            ApiError::Duplicate(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::to_error_response("DUPLICATE", &msg),
            )
                .into_response(),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server fault");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::to_error_response("INTERNAL", "An unexpected error occurred"),
                )
                    .into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(format!("{what} not found")),
            StoreError::Duplicate(msg) => ApiError::Duplicate(msg),
            StoreError::ForeignKey(msg) => ApiError::Validation(msg),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}
