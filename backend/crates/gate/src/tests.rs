//! Unit tests for the gate crate
//!
//! Backend implementations used here are deliberately misbehaving
//! (erroring, slow) to pin the fail-policy and deadline semantics.

use std::sync::Arc;
use std::time::Duration;

use crate::application::admit::AdmitRequestUseCase;
use crate::application::config::{FailPolicy, GateConfig};
use crate::domain::category::{LimiterCategory, RateSpec};
use crate::domain::decision::LimitDecision;
use crate::domain::key::LimitKey;
use crate::domain::repository::RateLimitBackend;
use crate::error::{GateError, GateResult};
use crate::infra::memory::MemoryRateLimiter;

/// Backend that always errors, as if the store connection dropped
#[derive(Clone)]
struct FailingBackend;

impl RateLimitBackend for FailingBackend {
    async fn evaluate(&self, _key: &LimitKey, _spec: &RateSpec) -> GateResult<LimitDecision> {
        Err(GateError::Internal("connection refused".to_string()))
    }
}

/// Backend that answers, but only after the given delay
#[derive(Clone)]
struct SlowBackend {
    delay: Duration,
}

impl RateLimitBackend for SlowBackend {
    async fn evaluate(&self, _key: &LimitKey, _spec: &RateSpec) -> GateResult<LimitDecision> {
        tokio::time::sleep(self.delay).await;
        Ok(LimitDecision::allowed(1))
    }
}

fn use_case<B>(backend: B, config: GateConfig) -> AdmitRequestUseCase<B>
where
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    AdmitRequestUseCase::new(Arc::new(backend), Arc::new(config))
}

mod admission {
    use super::*;

    #[tokio::test]
    async fn test_quota_allowed_then_denied() {
        // OtpIssuance default is 5/minute
        let gate = use_case(MemoryRateLimiter::new(), GateConfig::default());

        for i in 0..5 {
            let decision = gate
                .check(LimiterCategory::OtpIssuance, "10.0.0.5")
                .await
                .unwrap();
            assert!(decision.allowed, "request {} should be allowed", i + 1);
        }

        let decision = gate
            .check(LimiterCategory::OtpIssuance, "10.0.0.5")
            .await
            .unwrap();
        assert!(!decision.allowed);
        assert!(decision.retry_after > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_clients_have_independent_quotas() {
        let gate = use_case(MemoryRateLimiter::new(), GateConfig::default());

        // Exhaust Post (default 2/minute) for one client
        for _ in 0..2 {
            assert!(
                gate.check(LimiterCategory::Post, "10.0.0.5")
                    .await
                    .unwrap()
                    .allowed
            );
        }
        assert!(
            !gate
                .check(LimiterCategory::Post, "10.0.0.5")
                .await
                .unwrap()
                .allowed
        );

        // A different client in the same category is unaffected
        assert!(
            gate.check(LimiterCategory::Post, "10.0.0.6")
                .await
                .unwrap()
                .allowed
        );
    }

    #[tokio::test]
    async fn test_categories_have_independent_quotas() {
        let gate = use_case(MemoryRateLimiter::new(), GateConfig::default());

        for _ in 0..2 {
            assert!(
                gate.check(LimiterCategory::Post, "10.0.0.5")
                    .await
                    .unwrap()
                    .allowed
            );
        }
        assert!(
            !gate
                .check(LimiterCategory::Post, "10.0.0.5")
                .await
                .unwrap()
                .allowed
        );

        // Same client, different category: fresh counter
        assert!(
            gate.check(LimiterCategory::Get, "10.0.0.5")
                .await
                .unwrap()
                .allowed
        );
    }

    #[tokio::test]
    async fn test_admit_turns_denial_into_error() {
        let gate = use_case(MemoryRateLimiter::new(), GateConfig::default());

        for _ in 0..2 {
            gate.admit(LimiterCategory::Post, "10.0.0.5").await.unwrap();
        }

        let err = gate
            .admit(LimiterCategory::Post, "10.0.0.5")
            .await
            .unwrap_err();
        match err {
            GateError::AdmissionDenied { retry_after } => {
                assert!(retry_after > Duration::ZERO);
            }
            other => panic!("expected AdmissionDenied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_without_rate_fails_loudly() {
        let gate = use_case(MemoryRateLimiter::new(), GateConfig::default());

        let err = gate
            .check(LimiterCategory::Upload, "10.0.0.5")
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::ConfigurationMissing(_)));
    }
}

mod fail_policy {
    use super::*;

    #[tokio::test]
    async fn test_backend_error_fails_closed_by_default() {
        let gate = use_case(FailingBackend, GateConfig::default());

        // The gate must never proceed as if allowed when the backend
        // produced no decision
        let err = gate
            .check(LimiterCategory::Get, "10.0.0.5")
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::BackendUnavailable));
    }

    #[tokio::test]
    async fn test_backend_error_fail_open_admits() {
        let gate = use_case(FailingBackend, GateConfig::fail_open());

        let decision = gate.check(LimiterCategory::Get, "10.0.0.5").await.unwrap();
        assert!(decision.allowed);
    }

    #[tokio::test]
    async fn test_slow_backend_misses_deadline() {
        let config = GateConfig {
            policy: FailPolicy::Closed,
            backend_timeout: Duration::from_millis(20),
        };
        let gate = use_case(
            SlowBackend {
                delay: Duration::from_millis(200),
            },
            config,
        );

        let err = gate
            .check(LimiterCategory::Get, "10.0.0.5")
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::BackendUnavailable));
    }

    #[tokio::test]
    async fn test_fast_backend_meets_deadline() {
        let config = GateConfig {
            policy: FailPolicy::Closed,
            backend_timeout: Duration::from_millis(200),
        };
        let gate = use_case(
            SlowBackend {
                delay: Duration::from_millis(5),
            },
            config,
        );

        let decision = gate.check(LimiterCategory::Get, "10.0.0.5").await.unwrap();
        assert!(decision.allowed);
    }
}
