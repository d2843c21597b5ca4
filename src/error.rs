// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::{DatabaseError, MutationError};

/// HTTP API error with appropriate status codes and client-facing messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    InvalidJson(String),
    /// Storage engine rejected the statement; message passed through verbatim
    Storage(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 405 Method Not Allowed
    MethodNotAllowed,

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Storage(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::MethodNotAllowed => 405,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::InternalServerError(_) => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Storage(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "ok": false,
            "error": self.message(),
            "code": self.error_code()
        })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::Storage(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<MutationError> for ApiError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::InvalidBody => ApiError::invalid_json(err.to_string()),
            MutationError::MissingIdentifier | MutationError::NoUpdatableFields => {
                ApiError::bad_request(err.to_string())
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            // Operator-facing configuration problems are reported as-is
            DatabaseError::ConfigMissing(_) | DatabaseError::MissingTable(_) => {
                tracing::error!("Storage misconfigured: {}", err);
                ApiError::internal_server_error(err.to_string())
            }
            DatabaseError::Sqlx(_) => {
                let message = err.engine_message();
                tracing::error!("Storage error: {}", message);
                ApiError::storage(message)
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

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_errors_are_bad_requests() {
        let err: ApiError = MutationError::MissingIdentifier.into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Missing id");

        let err: ApiError = MutationError::NoUpdatableFields.into();
        assert_eq!(err.message(), "No updatable fields provided");

        let err: ApiError = MutationError::InvalidBody.into();
        assert_eq!(err.error_code(), "INVALID_JSON");
    }

    #[test]
    fn configuration_errors_are_server_errors() {
        let err: ApiError = DatabaseError::ConfigMissing("DATABASE_URL").into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "Missing configuration: DATABASE_URL");

        let err: ApiError = DatabaseError::MissingTable("materials").into();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn error_envelope_shape() {
        let body = ApiError::unauthorized("Unauthorized.").to_json();
        assert_eq!(body["ok"], json!(false));
        assert_eq!(body["error"], json!("Unauthorized."));
        assert_eq!(body["code"], json!("UNAUTHORIZED"));
    }
}
