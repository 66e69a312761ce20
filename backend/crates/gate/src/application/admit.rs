//! Admission Use Case
//!
//! The single decision point behind both entry shapes (inline and
//! middleware): build the limit key, resolve the rate, evaluate the
//! backend under a deadline, and route backend failure through the
//! configured fail policy — never through a dereferenced non-decision.

use std::sync::Arc;

use crate::application::config::{self, FailPolicy, GateConfig};
use crate::domain::category::LimiterCategory;
use crate::domain::decision::LimitDecision;
use crate::domain::key::LimitKey;
use crate::domain::repository::RateLimitBackend;
use crate::error::{GateError, GateResult};

/// Admission use case
pub struct AdmitRequestUseCase<B>
where
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    backend: Arc<B>,
    config: Arc<GateConfig>,
}

impl<B> AdmitRequestUseCase<B>
where
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    pub fn new(backend: Arc<B>, config: Arc<GateConfig>) -> Self {
        Self { backend, config }
    }

    /// Perform one admission check and return the decision
    ///
    /// The rate is resolved per call and the client identifier is the
    /// caller's responsibility to derive from the current request.
    pub async fn check(
        &self,
        category: LimiterCategory,
        client_id: &str,
    ) -> GateResult<LimitDecision> {
        let spec = config::resolve(category)?;
        let key = LimitKey::new(category, client_id);

        let outcome = tokio::time::timeout(
            self.config.backend_timeout,
            self.backend.evaluate(&key, &spec),
        )
        .await;

        let decision = match outcome {
            Ok(Ok(decision)) => decision,
            Ok(Err(e)) => {
                tracing::error!(category = %category, key = %key, error = %e, "Backend evaluation failed");
                return self.apply_fail_policy(category, &key);
            }
            Err(_) => {
                tracing::error!(
                    category = %category,
                    key = %key,
                    timeout_ms = self.config.backend_timeout.as_millis() as u64,
                    "Backend evaluation missed its deadline"
                );
                return self.apply_fail_policy(category, &key);
            }
        };

        if decision.allowed {
            tracing::info!(
                category = %category,
                key = %key,
                remaining = decision.remaining,
                "Request admitted"
            );
        } else {
            tracing::warn!(
                category = %category,
                key = %key,
                retry_after_ms = decision.retry_after.as_millis() as u64,
                "Request denied"
            );
        }

        Ok(decision)
    }

    /// Admission check that turns a denial into an error
    ///
    /// Handlers call this at the top, before any side-effecting work.
    pub async fn admit(
        &self,
        category: LimiterCategory,
        client_id: &str,
    ) -> GateResult<LimitDecision> {
        let decision = self.check(category, client_id).await?;
        if !decision.allowed {
            return Err(GateError::AdmissionDenied {
                retry_after: decision.retry_after,
            });
        }
        Ok(decision)
    }

    fn apply_fail_policy(
        &self,
        category: LimiterCategory,
        key: &LimitKey,
    ) -> GateResult<LimitDecision> {
        match self.config.policy {
            FailPolicy::Closed => Err(GateError::BackendUnavailable),
            FailPolicy::Open => {
                tracing::warn!(
                    category = %category,
                    key = %key,
                    "Backend unavailable, admitting per fail-open policy"
                );
                Ok(LimitDecision::fail_open())
            }
        }
    }
}
