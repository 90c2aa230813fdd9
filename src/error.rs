// Errors returned by handlers and the auth gate
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::DatabaseError;

/// Generic body for every 500; the cause only goes to the server log.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Every way a request can fail, with the status and body it maps to.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    ValidationError {
        message: String,
        field_errors: HashMap<String, String>,
    },
    InvalidJson(String),

    // 401 Unauthorized: no credentials presented
    Unauthorized,

    // 403 Forbidden: credentials presented but not valid
    Forbidden,

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError,
}

impl ApiError {
    /// Status code of the response
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to show to a client
    pub fn message(&self) -> &str {
        match self {
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized => "Unauthorized",
            ApiError::Forbidden => "Forbidden",
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Machine-readable code carried in JSON bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// JSON body used for 400 responses
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError {
                message,
                field_errors,
            } => json!({
                "error": true,
                "message": message,
                "code": self.error_code(),
                "field_errors": field_errors
            }),
            _ => json!({
                "error": true,
                "message": self.message(),
                "code": self.error_code()
            }),
        }
    }
}

impl ApiError {
    pub fn validation_error(field_errors: HashMap<String, String>) -> Self {
        ApiError::ValidationError {
            message: "Missing required fields".to_string(),
            field_errors,
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn dealership_not_found() -> Self {
        ApiError::not_found("Dealership not found.")
    }

    pub fn car_not_found() -> Self {
        ApiError::not_found("Car not found.")
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::MissingDealership(_) => ApiError::dealership_not_found(),
            DatabaseError::Timeout(limit) => {
                tracing::error!(?limit, "Store call timed out");
                ApiError::InternalServerError
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Cause goes to the log only
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::InternalServerError
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match self {
            ApiError::Unauthorized | ApiError::Forbidden => status.into_response(),
            ApiError::ValidationError { .. } | ApiError::InvalidJson(_) => {
                (status, Json(self.to_json())).into_response()
            }
            ApiError::NotFound(msg) => (status, msg).into_response(),
            ApiError::InternalServerError => (status, INTERNAL_ERROR_MESSAGE).into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
