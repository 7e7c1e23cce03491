// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// Client-safe messages shared by every handler boundary
pub const GENERIC_ERROR_MESSAGE: &str =
    "Oops! Something went wrong. Please try again in a moment.";
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Database connection error. Please check the database configuration.";

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every failure crossing a handler boundary is one of these variants;
/// nothing propagates to the transport layer uncaught. Store failures are
/// classified centrally by the `From<sqlx::Error>` impl below, never by
/// string-matching at call sites.
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized(String),

    // 400 Bad Request
    Validation(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error, store unreachable (distinguishing message)
    StoreUnavailable { detail: String },

    // 500 Internal Server Error, anything else (generic message)
    Unknown { detail: Option<String> },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::StoreUnavailable { .. } | ApiError::Unknown { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg,
            ApiError::StoreUnavailable { .. } => CONNECTION_ERROR_MESSAGE,
            ApiError::Unknown { .. } => GENERIC_ERROR_MESSAGE,
        }
    }

    /// Raw error detail, attached to responses only outside production
    fn detail(&self) -> Option<&str> {
        match self {
            ApiError::StoreUnavailable { detail } => Some(detail),
            ApiError::Unknown { detail } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({ "message": self.message() });
        if !crate::config::config().is_production() {
            if let Some(detail) = self.detail() {
                body["error"] = json!(detail);
            }
        }
        body
    }
}

/// Centralized store-error classifier.
///
/// Connection-level failures get the distinguishing "database connection"
/// message; a unique-index violation surfaces as a conflict (the store is
/// the authoritative guard behind the best-effort uniqueness pre-check);
/// everything else collapses to a generic 500.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => {
                tracing::error!("database connection error: {}", err);
                ApiError::StoreUnavailable {
                    detail: err.to_string(),
                }
            }
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                ApiError::conflict("A record with the same unique value already exists.")
            }
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found."),
            _ => {
                tracing::error!("database error: {}", err);
                ApiError::Unknown {
                    detail: Some(err.to_string()),
                }
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

// Automatic HTTP response conversion for axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
