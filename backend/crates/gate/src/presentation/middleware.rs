//! Gate Middleware
//!
//! Wrapping form of the admission check: a fixed category, with the
//! client identifier re-derived from the current request on every call.
//! Capturing the identifier at construction time would freeze one
//! client's identity into shared state, so it must never be done.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::admit::AdmitRequestUseCase;
use crate::application::config::GateConfig;
use crate::domain::category::LimiterCategory;
use crate::domain::repository::RateLimitBackend;

/// Middleware state
#[derive(Clone)]
pub struct GateMiddlewareState<B>
where
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub config: Arc<GateConfig>,
    pub category: LimiterCategory,
}

impl<B> GateMiddlewareState<B>
where
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    pub fn new(backend: Arc<B>, config: Arc<GateConfig>, category: LimiterCategory) -> Self {
        Self {
            backend,
            config,
            category,
        }
    }
}

/// Middleware that admits or denies the request for the fixed category
pub async fn limit_by_category<B>(
    state: GateMiddlewareState<B>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    let direct_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let client_id = platform::client::client_id(req.headers(), direct_ip);

    let use_case = AdmitRequestUseCase::new(state.backend.clone(), state.config.clone());

    match use_case.admit(state.category, &client_id).await {
        Ok(_) => Ok(next.run(req).await),
        Err(e) => Err(e.into_response()),
    }
}
