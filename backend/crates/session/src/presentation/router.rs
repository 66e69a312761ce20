//! Session Router

use axum::routing::{get, post};
use axum::{Router, middleware};
use std::sync::Arc;

use gate::{GateConfig, GateMiddlewareState, LimiterCategory, RateLimitBackend, limit_by_category};
use platform::store::KeyValueStore;

use crate::application::config::SessionConfig;
use crate::presentation::handlers::{self, SessionAppState};

/// Create the session router
///
/// `POST /auth` carries the Authenticate gate as a route layer; other
/// methods on the path get 405 from the method router. `GET /otp`
/// gates inline inside its handler.
pub fn session_router<S, B>(
    store: Arc<S>,
    config: Arc<SessionConfig>,
    gate_backend: Arc<B>,
    gate_config: Arc<GateConfig>,
) -> Router
where
    S: KeyValueStore + Clone + Send + Sync + 'static,
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    let state = SessionAppState {
        store,
        config,
        gate_backend: gate_backend.clone(),
        gate_config: gate_config.clone(),
    };

    let auth_gate =
        GateMiddlewareState::new(gate_backend, gate_config, LimiterCategory::Authenticate);

    Router::new()
        .route(
            "/auth",
            post(handlers::authenticate::<S, B>).layer(middleware::from_fn(
                move |req, next| limit_by_category(auth_gate.clone(), req, next),
            )),
        )
        .route("/otp", get(handlers::issue_otp::<S, B>))
        .with_state(state)
}
