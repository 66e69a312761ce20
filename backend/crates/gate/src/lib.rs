//! Gate (Admission Control) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Categories, rate specs, limit keys, decisions, backend trait
//! - `application/` - Rate resolution and the admission use case
//! - `infra/` - Redis (GCRA) and in-memory backend implementations
//! - `presentation/` - Axum middleware form of the gate
//!
//! ## Features
//! - Per-client, per-category rate limiting (GCRA / leaky bucket)
//! - Two entry shapes over one core check: inline and middleware
//! - Explicit fail-open / fail-closed policy when the backend is down
//! - Environment-overridable rates with built-in defaults
//!
//! ## Decision model
//! Counters live in the shared key-value store, so the decision is
//! consistent across all gateway instances. The gateway itself holds no
//! locks and caches nothing between requests.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::admit::AdmitRequestUseCase;
pub use application::config::{FailPolicy, GateConfig, resolve, resolve_with};
pub use domain::category::{LimiterCategory, RateSpec, Window};
pub use domain::decision::LimitDecision;
pub use domain::key::LimitKey;
pub use domain::repository::RateLimitBackend;
pub use error::{GateError, GateResult};
pub use infra::memory::MemoryRateLimiter;
pub use infra::redis::RedisRateLimiter;
pub use presentation::middleware::{GateMiddlewareState, limit_by_category};
