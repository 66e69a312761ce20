//! Authenticate Use Case
//!
//! Validates the credential shape and mints a signed session token.
//! The credential itself is not verified against anything; this
//! service's job is admission and correlation, not identity.

use std::sync::Arc;

use crate::application::config::SessionConfig;
use crate::domain::token::SessionToken;
use crate::error::{SessionError, SessionResult};

/// Input for the authenticate use case
#[derive(Debug, Clone)]
pub struct AuthenticateInput {
    pub auth_type: String,
    pub value: String,
}

/// Outcome of authentication: the minted token and its cookie header
#[derive(Debug, Clone)]
pub struct AuthenticateOutcome {
    pub token: SessionToken,
    pub set_cookie: String,
}

/// Authenticate use case
pub struct AuthenticateUseCase {
    config: Arc<SessionConfig>,
}

impl AuthenticateUseCase {
    pub fn new(config: Arc<SessionConfig>) -> Self {
        Self { config }
    }

    /// Validate the credential shape and mint a session
    pub fn execute(&self, input: &AuthenticateInput) -> SessionResult<AuthenticateOutcome> {
        if input.auth_type.trim().is_empty() {
            return Err(SessionError::MalformedRequest(
                "field 'type' must be a non-empty string".to_string(),
            ));
        }
        if input.value.trim().is_empty() {
            return Err(SessionError::MalformedRequest(
                "field 'value' must be a non-empty string".to_string(),
            ));
        }

        let now_ms = chrono::Utc::now().timestamp_millis();
        let token = SessionToken::mint(now_ms);
        let set_cookie = self.config.cookie.build_set_cookie(
            &token.encode(&self.config.session_secret),
            self.config.session_lifetime.as_secs(),
        );

        tracing::info!(
            session_id = %token.session_id,
            auth_type = %input.auth_type,
            "Session minted"
        );

        Ok(AuthenticateOutcome { token, set_cookie })
    }
}
