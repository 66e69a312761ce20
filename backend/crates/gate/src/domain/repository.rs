//! Backend Trait
//!
//! Interface for the rate-limit capability. Implementations are in the
//! infrastructure layer; the GCRA arithmetic is theirs, the gate only
//! consumes decisions.

use crate::domain::category::RateSpec;
use crate::domain::decision::LimitDecision;
use crate::domain::key::LimitKey;
use crate::error::GateResult;

/// Rate-limit backend trait
///
/// `evaluate` atomically updates the counter for `key` and returns a
/// decision. An `Err` means the backend could not decide; callers must
/// route it through the gate's fail policy, never treat it as allowed.
#[trait_variant::make(RateLimitBackend: Send)]
pub trait LocalRateLimitBackend {
    /// Evaluate one request against the counter for `key`
    async fn evaluate(&self, key: &LimitKey, spec: &RateSpec) -> GateResult<LimitDecision>;
}
