//! Generic key-value endpoints
//!
//! Reads gate under the Get category, writes under Post. Admission runs
//! inline before the store is touched, so a denied client causes no
//! store traffic.

use axum::Router;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use gate::{AdmitRequestUseCase, GateConfig, LimiterCategory, RateLimitBackend};
use kernel::error::app_error::{AppError, OptionExt};
use platform::client::client_id;
use platform::store::{KeyValueStore, StoreError};

/// Deadline for every key-value store call
const STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared state for key-value handlers
#[derive(Clone)]
pub struct KvAppState<S, B>
where
    S: KeyValueStore + Clone + Send + Sync + 'static,
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub gate_backend: Arc<B>,
    pub gate_config: Arc<GateConfig>,
}

/// Create the key-value router
pub fn kv_router<S, B>(
    store: Arc<S>,
    gate_backend: Arc<B>,
    gate_config: Arc<GateConfig>,
) -> Router
where
    S: KeyValueStore + Clone + Send + Sync + 'static,
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    let state = KvAppState {
        store,
        gate_backend,
        gate_config,
    };

    Router::new()
        .route("/kv/{key}", get(get_value::<S, B>).put(put_value::<S, B>))
        .with_state(state)
}

/// GET /kv/{key}
pub async fn get_value<S, B>(
    State(state): State<KvAppState<S, B>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<String, Response>
where
    S: KeyValueStore + Clone + Send + Sync + 'static,
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    admit(&state, LimiterCategory::Get, &headers, addr).await?;

    let value = state
        .store
        .get(&key, STORE_TIMEOUT)
        .await
        .map_err(store_error_response)?;

    value
        .ok_or_not_found(format!("No value stored under '{key}'"))
        .map_err(|e| e.into_response())
}

/// PUT /kv/{key}
///
/// Body is the raw value string.
pub async fn put_value<S, B>(
    State(state): State<KvAppState<S, B>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: String,
) -> Result<&'static str, Response>
where
    S: KeyValueStore + Clone + Send + Sync + 'static,
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    admit(&state, LimiterCategory::Post, &headers, addr).await?;

    state
        .store
        .set(&key, &body, None, STORE_TIMEOUT)
        .await
        .map_err(store_error_response)?;

    Ok("stored")
}

async fn admit<S, B>(
    state: &KvAppState<S, B>,
    category: LimiterCategory,
    headers: &HeaderMap,
    addr: SocketAddr,
) -> Result<(), Response>
where
    S: KeyValueStore + Clone + Send + Sync + 'static,
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    let client = client_id(headers, Some(addr.ip()));
    let use_case =
        AdmitRequestUseCase::new(state.gate_backend.clone(), state.gate_config.clone());
    use_case
        .admit(category, &client)
        .await
        .map(|_| ())
        .map_err(|e| e.into_response())
}

fn store_error_response(err: StoreError) -> Response {
    let app_err = match err {
        StoreError::Timeout(deadline) => {
            tracing::error!(deadline_ms = deadline.as_millis() as u64, "Store missed deadline");
            AppError::service_unavailable("Store did not respond in time")
                .with_action("Retry after a short delay")
        }
        StoreError::Backend(err) => {
            tracing::error!(error = %err, "Store backend error");
            err.into()
        }
    };
    app_err.into_response()
}
