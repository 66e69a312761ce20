//! Gate Error Types
//!
//! This module provides gate-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::time::Duration;
use thiserror::Error;

use crate::domain::category::LimiterCategory;

/// Gate-specific result type alias
pub type GateResult<T> = Result<T, GateError>;

/// Gate-specific error variants
#[derive(Debug, Error)]
pub enum GateError {
    /// Quota exhausted; recoverable after `retry_after`
    #[error("Too many requests; retry after {retry_after:?}")]
    AdmissionDenied { retry_after: Duration },

    /// Backend errored or missed its deadline under a fail-closed policy
    #[error("Rate limit backend unavailable")]
    BackendUnavailable,

    /// A category has no resolvable rate (no override, no default)
    #[error("No rate configured for category {0}")]
    ConfigurationMissing(LimiterCategory),

    /// Backend I/O error
    #[error("Rate limit backend error: {0}")]
    Backend(#[from] redis::RedisError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::AdmissionDenied { .. } => StatusCode::TOO_MANY_REQUESTS,
            GateError::BackendUnavailable | GateError::Backend(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            GateError::ConfigurationMissing(_) | GateError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::AdmissionDenied { .. } => ErrorKind::TooManyRequests,
            GateError::BackendUnavailable | GateError::Backend(_) => ErrorKind::ServiceUnavailable,
            GateError::ConfigurationMissing(_) | GateError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            GateError::AdmissionDenied { .. } => {
                err.with_action("Retry after the indicated delay")
            }
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            GateError::Backend(e) => {
                tracing::error!(error = %e, "Rate limit backend error");
            }
            GateError::BackendUnavailable => {
                tracing::error!("Rate limit backend unavailable");
            }
            GateError::ConfigurationMissing(category) => {
                tracing::error!(category = %category, "No rate configured for category");
            }
            GateError::Internal(msg) => {
                tracing::error!(message = %msg, "Gate internal error");
            }
            GateError::AdmissionDenied { retry_after } => {
                tracing::debug!(retry_after_ms = retry_after.as_millis() as u64, "Admission denied");
            }
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        self.log();
        let retry_after = match &self {
            GateError::AdmissionDenied { retry_after } => Some(*retry_after),
            _ => None,
        };

        let mut response = self.to_app_error().into_response();
        if let Some(retry_after) = retry_after {
            // Retry-After is whole seconds; round up so clients never retry early
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let denied = GateError::AdmissionDenied {
            retry_after: Duration::from_secs(3),
        };
        assert_eq!(denied.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            GateError::BackendUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            GateError::ConfigurationMissing(LimiterCategory::Upload).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_denied_response_has_retry_after() {
        let denied = GateError::AdmissionDenied {
            retry_after: Duration::from_millis(2500),
        };
        let response = denied.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        // 2.5s rounds up to 3
        assert_eq!(
            response.headers().get(header::RETRY_AFTER),
            Some(&HeaderValue::from(3u64))
        );
    }

    #[test]
    fn test_unavailable_response_has_no_retry_after() {
        let response = GateError::BackendUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
