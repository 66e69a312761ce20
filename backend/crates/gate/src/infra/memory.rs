//! In-Memory Rate-Limit Backend
//!
//! Single-process GCRA with the same arithmetic as the Redis script.
//! Used in tests and for local development without a store; it cannot
//! coordinate across gateway instances.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::category::RateSpec;
use crate::domain::decision::LimitDecision;
use crate::domain::key::LimitKey;
use crate::domain::repository::RateLimitBackend;
use crate::error::GateResult;

/// In-memory rate limiter
#[derive(Clone, Default)]
pub struct MemoryRateLimiter {
    // key -> theoretical arrival time, epoch ms
    state: Arc<Mutex<HashMap<String, u64>>>,
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// GCRA step at an explicit instant (tests pin the clock with this)
    pub fn evaluate_at(&self, key: &LimitKey, spec: &RateSpec, now_ms: u64) -> LimitDecision {
        let emission_interval = spec.emission_interval_ms();
        let burst_offset = emission_interval * spec.quantity as u64;

        let mut state = self.state.lock().expect("limiter mutex poisoned");
        let tat = state.get(key.as_str()).copied().unwrap_or(0).max(now_ms);

        let new_tat = tat + emission_interval;
        let allow_at = new_tat.saturating_sub(burst_offset);

        if allow_at > now_ms {
            return LimitDecision::denied(Duration::from_millis(allow_at - now_ms));
        }

        state.insert(key.as_str().to_string(), new_tat);
        let remaining = (now_ms + burst_offset - new_tat) / emission_interval;
        LimitDecision::allowed(remaining as u32)
    }
}

impl RateLimitBackend for MemoryRateLimiter {
    async fn evaluate(&self, key: &LimitKey, spec: &RateSpec) -> GateResult<LimitDecision> {
        let now_ms = chrono::Utc::now().timestamp_millis() as u64;
        Ok(self.evaluate_at(key, spec, now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::LimiterCategory;

    const NOW: u64 = 1_700_000_000_000;

    fn key() -> LimitKey {
        LimitKey::new(LimiterCategory::OtpIssuance, "10.0.0.5")
    }

    #[test]
    fn test_burst_then_denial() {
        let limiter = MemoryRateLimiter::new();
        let spec = RateSpec::per_minute(5);

        for i in 0..5 {
            let decision = limiter.evaluate_at(&key(), &spec, NOW);
            assert!(decision.allowed, "request {} should be allowed", i + 1);
            assert_eq!(decision.remaining, 4 - i);
        }

        let decision = limiter.evaluate_at(&key(), &spec, NOW);
        assert!(!decision.allowed);
        assert_eq!(decision.retry_after, Duration::from_millis(12_000));
    }

    #[test]
    fn test_denial_does_not_consume_quota() {
        let limiter = MemoryRateLimiter::new();
        let spec = RateSpec::per_minute(1);

        assert!(limiter.evaluate_at(&key(), &spec, NOW).allowed);
        assert!(!limiter.evaluate_at(&key(), &spec, NOW).allowed);

        // one emission interval later the single slot is free again
        let later = NOW + spec.emission_interval_ms();
        assert!(limiter.evaluate_at(&key(), &spec, later).allowed);
    }

    #[test]
    fn test_quota_refills_over_time() {
        let limiter = MemoryRateLimiter::new();
        let spec = RateSpec::per_minute(5);

        for _ in 0..5 {
            limiter.evaluate_at(&key(), &spec, NOW);
        }
        assert!(!limiter.evaluate_at(&key(), &spec, NOW).allowed);

        // a full window later the whole burst is available again
        let later = NOW + spec.window.as_millis();
        let decision = limiter.evaluate_at(&key(), &spec, later);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 4);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = MemoryRateLimiter::new();
        let spec = RateSpec::per_minute(1);
        let other = LimitKey::new(LimiterCategory::OtpIssuance, "10.0.0.6");

        assert!(limiter.evaluate_at(&key(), &spec, NOW).allowed);
        assert!(!limiter.evaluate_at(&key(), &spec, NOW).allowed);
        assert!(limiter.evaluate_at(&other, &spec, NOW).allowed);
    }
}
