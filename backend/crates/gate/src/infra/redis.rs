//! Redis Rate-Limit Backend
//!
//! GCRA (leaky-bucket) evaluation as one atomic Lua script, so the
//! decision is consistent across all gateway instances sharing the
//! store. State per key is a single value: the theoretical arrival
//! time (TAT) in epoch milliseconds.

use redis::aio::ConnectionManager;

use crate::domain::category::RateSpec;
use crate::domain::decision::LimitDecision;
use crate::domain::key::LimitKey;
use crate::domain::repository::RateLimitBackend;
use crate::error::GateResult;
use std::time::Duration;

/// GCRA in Lua.
///
/// ARGV: emission interval (ms), capacity, now (epoch ms).
/// Returns {allowed, remaining, retry_after_ms}. The TAT is only
/// advanced on an allowed request; a denied request leaves the counter
/// untouched.
const GCRA_SCRIPT: &str = r#"
local key = KEYS[1]
local emission_interval = tonumber(ARGV[1])
local capacity = tonumber(ARGV[2])
local now = tonumber(ARGV[3])

local burst_offset = emission_interval * capacity

local tat = tonumber(redis.call('GET', key))
if tat == nil or tat < now then
    tat = now
end

local new_tat = tat + emission_interval
local allow_at = new_tat - burst_offset

if allow_at > now then
    return {0, 0, allow_at - now}
end

redis.call('SET', key, new_tat, 'PX', burst_offset)
local remaining = math.floor((now + burst_offset - new_tat) / emission_interval)
return {1, remaining, 0}
"#;

/// Redis-backed rate limiter
#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    script: redis::Script,
}

impl RedisRateLimiter {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            script: redis::Script::new(GCRA_SCRIPT),
        }
    }
}

impl RateLimitBackend for RedisRateLimiter {
    async fn evaluate(&self, key: &LimitKey, spec: &RateSpec) -> GateResult<LimitDecision> {
        let mut conn = self.conn.clone();
        let now_ms = chrono::Utc::now().timestamp_millis();

        let (allowed, remaining, retry_after_ms): (i64, i64, i64) = self
            .script
            .key(key.as_str())
            .arg(spec.emission_interval_ms())
            .arg(spec.quantity)
            .arg(now_ms)
            .invoke_async(&mut conn)
            .await?;

        if allowed == 1 {
            Ok(LimitDecision::allowed(remaining.max(0) as u32))
        } else {
            Ok(LimitDecision::denied(Duration::from_millis(
                retry_after_ms.max(0) as u64,
            )))
        }
    }
}
