//! OTP Issuance Use Case
//!
//! Resolves the session token from its cookie value, then returns the
//! session's active one-time password, generating one only if none is
//! stored. Store failures surface as errors; an unreachable store is
//! never treated as "no code exists yet".

use std::sync::Arc;

use platform::store::KeyValueStore;

use crate::application::config::SessionConfig;
use crate::domain::token::SessionToken;
use crate::error::{SessionError, SessionResult};

/// Outcome of OTP issuance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpIssuance {
    pub otp: String,
    /// Whether an already-stored code was returned
    pub reused: bool,
}

/// OTP issuance use case
pub struct IssueOtpUseCase<S>
where
    S: KeyValueStore + Send + Sync + 'static,
{
    store: Arc<S>,
    config: Arc<SessionConfig>,
}

impl<S> IssueOtpUseCase<S>
where
    S: KeyValueStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, config: Arc<SessionConfig>) -> Self {
        Self { store, config }
    }

    /// Issue or reuse the one-time password for a session cookie value
    pub async fn execute(&self, raw_token: &str) -> SessionResult<OtpIssuance> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        self.execute_at(raw_token, now_ms).await
    }

    /// Same as [`execute`](Self::execute) with a pinned clock
    pub async fn execute_at(&self, raw_token: &str, now_ms: i64) -> SessionResult<OtpIssuance> {
        let token = SessionToken::decode(raw_token, &self.config.session_secret)?;
        if token.is_expired(self.config.session_lifetime, now_ms) {
            return Err(SessionError::SessionExpired);
        }

        let key = token.otp_key();
        let existing = self.store.get(&key, self.config.store_timeout).await?;
        if let Some(otp) = existing.filter(|v| !v.is_empty()) {
            tracing::info!(session_id = %token.session_id, "Reusing active one-time password");
            return Ok(OtpIssuance { otp, reused: true });
        }

        let otp = generate_code();
        // OTP state must not outlive the session it belongs to
        let ttl = token.remaining(self.config.session_lifetime, now_ms);
        self.store
            .set(&key, &otp, Some(ttl), self.config.store_timeout)
            .await?;

        tracing::info!(
            session_id = %token.session_id,
            ttl_ms = ttl.as_millis() as u64,
            "Issued new one-time password"
        );

        Ok(OtpIssuance { otp, reused: false })
    }
}

/// Random decimal code in 0..=999999
fn generate_code() -> String {
    use rand::Rng;

    rand::rng().random_range(0..=999_999u32).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::store::MemoryKeyValueStore;
    use std::time::Duration;

    const NOW: i64 = 1_700_000_000_000;

    fn fixture() -> (Arc<MemoryKeyValueStore>, Arc<SessionConfig>) {
        (
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(SessionConfig::new([2u8; 32])),
        )
    }

    #[tokio::test]
    async fn test_issues_then_reuses() {
        let (store, config) = fixture();
        let uc = IssueOtpUseCase::new(store, config.clone());
        let cookie = SessionToken::mint(NOW).encode(&config.session_secret);

        let first = uc.execute_at(&cookie, NOW + 1_000).await.unwrap();
        assert!(!first.reused);

        let second = uc.execute_at(&cookie, NOW + 2_000).await.unwrap();
        assert!(second.reused);
        assert_eq!(second.otp, first.otp);
    }

    #[tokio::test]
    async fn test_expired_session_rejected() {
        let (store, config) = fixture();
        let uc = IssueOtpUseCase::new(store, config.clone());
        let cookie = SessionToken::mint(NOW).encode(&config.session_secret);

        let result = uc.execute_at(&cookie, NOW + 60_000).await;
        assert!(matches!(result, Err(SessionError::SessionExpired)));
    }

    #[tokio::test]
    async fn test_tampered_cookie_rejected() {
        let (store, config) = fixture();
        let uc = IssueOtpUseCase::new(store, config);

        let result = uc.execute_at("not-a-token", NOW).await;
        assert!(matches!(result, Err(SessionError::SessionInvalid)));
    }

    #[tokio::test]
    async fn test_store_timeout_is_not_treated_as_missing_code() {
        let store = Arc::new(MemoryKeyValueStore::with_latency(Duration::from_millis(50)));
        let mut config = SessionConfig::new([2u8; 32]);
        config.store_timeout = Duration::from_millis(5);
        let config = Arc::new(config);

        let uc = IssueOtpUseCase::new(store, config.clone());
        let cookie = SessionToken::mint(NOW).encode(&config.session_secret);

        let result = uc.execute_at(&cookie, NOW + 1_000).await;
        assert!(matches!(result, Err(SessionError::StoreTimeout(_))));
    }

    #[tokio::test]
    async fn test_generated_code_is_decimal_in_range() {
        for _ in 0..100 {
            let code = generate_code();
            let n: u32 = code.parse().unwrap();
            assert!(n <= 999_999);
        }
    }
}
