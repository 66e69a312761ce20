//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use gate::{AdmitRequestUseCase, GateConfig, LimiterCategory, RateLimitBackend};
use platform::client::client_id;
use platform::cookie::extract_cookie;
use platform::store::KeyValueStore;

use crate::application::authenticate::{AuthenticateInput, AuthenticateUseCase};
use crate::application::config::SessionConfig;
use crate::application::issue_otp::IssueOtpUseCase;
use crate::error::{SessionError, SessionResult};
use crate::presentation::dto::{AuthenticateRequest, AuthenticateResponse, OtpResponse};
use crate::presentation::extract::Payload;

/// Shared state for session handlers
#[derive(Clone)]
pub struct SessionAppState<S, B>
where
    S: KeyValueStore + Clone + Send + Sync + 'static,
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<SessionConfig>,
    pub gate_backend: Arc<B>,
    pub gate_config: Arc<GateConfig>,
}

// ============================================================================
// Authenticate
// ============================================================================

/// POST /auth
///
/// Admission for this route runs in the router's middleware layer
/// (Authenticate category), so the handler only validates and mints.
pub async fn authenticate<S, B>(
    State(state): State<SessionAppState<S, B>>,
    Payload(req): Payload<AuthenticateRequest>,
) -> SessionResult<impl IntoResponse>
where
    S: KeyValueStore + Clone + Send + Sync + 'static,
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    let use_case = AuthenticateUseCase::new(state.config.clone());

    let outcome = use_case.execute(&AuthenticateInput {
        auth_type: req.auth_type,
        value: req.value,
    })?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, outcome.set_cookie)],
        Json(AuthenticateResponse {
            session_id: outcome.token.session_id,
        }),
    ))
}

// ============================================================================
// OTP Issuance
// ============================================================================

/// GET /otp
///
/// Inline admission (OtpIssuance category) runs before the session is
/// even looked at, so a denied client causes no store reads or writes.
pub async fn issue_otp<S, B>(
    State(state): State<SessionAppState<S, B>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
) -> SessionResult<Json<OtpResponse>>
where
    S: KeyValueStore + Clone + Send + Sync + 'static,
    B: RateLimitBackend + Clone + Send + Sync + 'static,
{
    let client = client_id(&headers, Some(addr.ip()));
    let gate = AdmitRequestUseCase::new(state.gate_backend.clone(), state.gate_config.clone());
    gate.admit(LimiterCategory::OtpIssuance, &client).await?;

    let cookie = extract_cookie(&headers, &state.config.cookie.name)
        .ok_or(SessionError::NoSession)?;

    let use_case = IssueOtpUseCase::new(state.store.clone(), state.config.clone());
    let issuance = use_case.execute(&cookie).await?;

    Ok(Json(OtpResponse {
        otp: issuance.otp,
        reused: issuance.reused,
    }))
}
