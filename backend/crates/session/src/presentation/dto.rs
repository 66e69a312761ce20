//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// POST /auth request body
#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    /// Credential kind (`type` on the wire)
    #[serde(rename = "type")]
    pub auth_type: String,
    pub value: String,
}

/// POST /auth response body
#[derive(Debug, Serialize)]
pub struct AuthenticateResponse {
    pub session_id: Uuid,
}

/// GET /otp response body
#[derive(Debug, Serialize)]
pub struct OtpResponse {
    pub otp: String,
    /// Whether an already-active code was returned
    pub reused: bool,
}
