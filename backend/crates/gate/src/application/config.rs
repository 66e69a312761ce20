//! Gate Configuration and Rate Resolution
//!
//! Rates are resolved at call time, never cached across requests, so an
//! environment change takes effect without restart and tests can pin
//! the lookup.

use std::time::Duration;

use crate::domain::category::{LimiterCategory, RateSpec};
use crate::error::{GateError, GateResult};

/// Behavior when the backend cannot produce a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailPolicy {
    /// Deny the request and surface 503 (default)
    #[default]
    Closed,
    /// Allow the request and log a warning (non-critical categories)
    Open,
}

/// Gate application configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Policy applied when the backend errors or misses its deadline
    pub policy: FailPolicy,
    /// Deadline for one backend evaluation
    pub backend_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            policy: FailPolicy::Closed,
            backend_timeout: Duration::from_secs(2),
        }
    }
}

impl GateConfig {
    pub fn fail_open() -> Self {
        Self {
            policy: FailPolicy::Open,
            ..Default::default()
        }
    }
}

/// Resolve the rate for a category from the process environment
///
/// Override format is `"<label>:<integer>"` in the variable named after
/// the category (e.g. `OTP_ISSUANCE=window:10`). Absent or malformed
/// overrides fall back to the built-in default; a category with neither
/// is a configuration error, never a zero rate.
pub fn resolve(category: LimiterCategory) -> GateResult<RateSpec> {
    resolve_with(category, |name| std::env::var(name).ok())
}

/// Resolve with an explicit lookup (deterministic for a fixed environment)
pub fn resolve_with<F>(category: LimiterCategory, lookup: F) -> GateResult<RateSpec>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(category.env_var()) {
        match parse_override(&raw) {
            Some(quantity) => {
                return Ok(RateSpec {
                    quantity,
                    window: category.window(),
                });
            }
            None => {
                tracing::warn!(
                    category = %category,
                    raw = %raw,
                    "Malformed rate override, falling back to default"
                );
            }
        }
    }

    category
        .default_spec()
        .ok_or(GateError::ConfigurationMissing(category))
}

/// Parse `"<label>:<integer>"`, rejecting zero and negative quantities
fn parse_override(raw: &str) -> Option<u32> {
    let (_, value) = raw.split_once(':')?;
    value.trim().parse::<u32>().ok().filter(|&q| q > 0)
}
