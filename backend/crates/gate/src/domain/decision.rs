//! Limit Decisions

use std::time::Duration;

/// Result of one admission check
///
/// Produced fresh per call and never persisted by the gateway; the
/// counter state behind it lives in the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitDecision {
    /// Whether this request may proceed
    pub allowed: bool,
    /// Quota left in the current window
    pub remaining: u32,
    /// Time until the next permitted attempt (zero when allowed)
    pub retry_after: Duration,
}

impl LimitDecision {
    pub fn allowed(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after: Duration::ZERO,
        }
    }

    pub fn denied(retry_after: Duration) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after,
        }
    }

    /// Decision substituted when the backend is down and the gate is
    /// configured fail-open. The remaining quota is unknown.
    pub fn fail_open() -> Self {
        Self {
            allowed: true,
            remaining: 0,
            retry_after: Duration::ZERO,
        }
    }
}
