//! Service error types with HTTP status code mapping.
//!
//! [`ServiceError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "Sort order must be ASC or DESC"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 3000–3999 | Server     | 500 Internal Server Error |
/// | 429       | Throttling | 429 Too Many Requests     |
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// `sort_order` was not `ASC` or `DESC`.
    #[error("Sort order must be ASC or DESC")]
    InvalidSortOrder,

    /// `sort_field` was not `id` or `data`.
    #[error("Sort field must be id or data")]
    InvalidSortField,

    /// `aspect` did not name a known monitoring check.
    #[error("Unrecognized aspect")]
    UnrecognizedAspect,

    /// Fetched or stored data did not have the expected shape.
    #[error("Invalid data format: {0}")]
    InvalidData(String),

    /// Database failure.
    #[error("database error: {0}")]
    Database(String),

    /// Client exceeded rate limit.
    #[error("rate limit exceeded; retry after {retry_after_ms} ms")]
    RateLimited {
        /// Milliseconds until the client may retry.
        retry_after_ms: u64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidSortOrder => 1001,
            Self::InvalidSortField => 1002,
            Self::UnrecognizedAspect => 1003,
            Self::InvalidData(_) => 1004,
            Self::Database(_) => 3001,
            Self::RateLimited { .. } => 429,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSortOrder
            | Self::InvalidSortField
            | Self::UnrecognizedAspect
            | Self::InvalidData(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    /// Postgres data exceptions (SQLSTATE class `22`) are the caller's
    /// fault; everything else is a server-side failure.
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.code().is_some_and(|code| code.starts_with("22")) {
                return Self::InvalidData(db_err.message().to_string());
            }
        }
        Self::Database(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let retry_after = match &self {
            Self::RateLimited { retry_after_ms } => Some(retry_after_ms.div_ceil(1000).max(1)),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_request() {
        for err in [
            ServiceError::InvalidSortOrder,
            ServiceError::InvalidSortField,
            ServiceError::UnrecognizedAspect,
            ServiceError::InvalidData("missing id".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn messages_match_endpoint_contract() {
        assert_eq!(
            ServiceError::InvalidSortOrder.to_string(),
            "Sort order must be ASC or DESC"
        );
        assert_eq!(
            ServiceError::InvalidSortField.to_string(),
            "Sort field must be id or data"
        );
        assert_eq!(ServiceError::UnrecognizedAspect.to_string(), "Unrecognized aspect");
    }

    #[test]
    fn rate_limited_sets_retry_after() {
        let response = ServiceError::RateLimited {
            retry_after_ms: 2_400,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let Some(value) = response.headers().get(header::RETRY_AFTER) else {
            panic!("missing Retry-After header");
        };
        assert_eq!(value, "3");
    }

    /// Minimal driver error carrying only a SQLSTATE and a message.
    #[derive(Debug, thiserror::Error)]
    #[error("{message}")]
    struct StubDbError {
        code: &'static str,
        message: &'static str,
    }

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            self.message
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(std::borrow::Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn db_error(code: &'static str, message: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError { code, message }))
    }

    #[test]
    fn data_exception_maps_to_invalid_data() {
        let err = ServiceError::from(db_error("22P05", "unsupported Unicode escape sequence"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Invalid data format: unsupported Unicode escape sequence"
        );
    }

    #[test]
    fn other_sqlstate_maps_to_database_error() {
        let err = ServiceError::from(db_error("23505", "duplicate key value"));
        assert!(matches!(err, ServiceError::Database(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn pool_timeout_maps_to_database_error() {
        let err = ServiceError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
    }
}
