//! Session Error Types
//!
//! This module provides session-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Session-specific result type alias
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific error variants
#[derive(Debug, Error)]
pub enum SessionError {
    /// Request carries no session cookie
    #[error("No session cookie present")]
    NoSession,

    /// Token lifetime has elapsed
    #[error("Session has expired")]
    SessionExpired,

    /// Token is structurally broken or its signature does not verify
    #[error("Session token is invalid")]
    SessionInvalid,

    /// Request body failed validation
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Store operation missed its deadline
    #[error("Store operation exceeded {0:?} deadline")]
    StoreTimeout(Duration),

    /// Store backend I/O error
    #[error("Store backend error: {0}")]
    Store(redis::RedisError),

    /// Admission control denial or backend failure
    #[error(transparent)]
    Gate(#[from] gate::GateError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout(deadline) => SessionError::StoreTimeout(deadline),
            StoreError::Backend(err) => SessionError::Store(err),
        }
    }
}

impl SessionError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SessionError::NoSession
            | SessionError::SessionExpired
            | SessionError::SessionInvalid
            | SessionError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            SessionError::StoreTimeout(_) | SessionError::Store(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            SessionError::Gate(err) => err.status_code(),
            SessionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            SessionError::NoSession | SessionError::SessionExpired
            | SessionError::SessionInvalid => {
                AppError::bad_request(self.to_string())
                    .with_action("Authenticate again to obtain a new session")
            }
            SessionError::MalformedRequest(_) => AppError::bad_request(self.to_string()),
            SessionError::StoreTimeout(_) | SessionError::Store(_) => {
                AppError::service_unavailable("Backing store is unavailable")
                    .with_action("Retry after a short delay")
            }
            SessionError::Gate(err) => err.to_app_error(),
            SessionError::Internal(_) => {
                AppError::new(ErrorKind::InternalServerError, "Internal error")
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SessionError::NoSession
            | SessionError::SessionExpired
            | SessionError::SessionInvalid => {
                tracing::debug!(error = %self, "Session rejected");
            }
            SessionError::MalformedRequest(detail) => {
                tracing::debug!(detail = %detail, "Request rejected");
            }
            SessionError::StoreTimeout(deadline) => {
                tracing::error!(deadline_ms = deadline.as_millis() as u64, "Store missed deadline");
            }
            SessionError::Store(err) => {
                tracing::error!(error = %err, "Store backend error");
            }
            // Gate errors log inside their own IntoResponse
            SessionError::Gate(_) => {}
            SessionError::Internal(msg) => {
                tracing::error!(message = %msg, "Session internal error");
            }
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            // Gate errors carry their own response shape (Retry-After)
            SessionError::Gate(err) => err.into_response(),
            other => other.to_app_error().into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SessionError::NoSession.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            SessionError::SessionExpired.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SessionError::SessionInvalid.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SessionError::StoreTimeout(Duration::from_secs(2)).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_gate_denial_passes_through() {
        let err = SessionError::Gate(gate::GateError::AdmissionDenied {
            retry_after: Duration::from_secs(30),
        });
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_store_timeout_conversion() {
        let err: SessionError = StoreError::Timeout(Duration::from_secs(2)).into();
        assert!(matches!(err, SessionError::StoreTimeout(_)));
    }
}
