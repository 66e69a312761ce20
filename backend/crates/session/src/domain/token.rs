//! Session Tokens
//!
//! Wire format: `<session-id>.<issued-at-ms>.<signature>` where the
//! signature is URL-safe base64 of HMAC-SHA256 over the first two
//! parts. The issuance time travels inside the signed payload, so the
//! server can check expiry without a session table and the client
//! cannot extend its own lifetime.

use std::time::Duration;
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};

/// A decoded, signature-verified session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub session_id: Uuid,
    pub issued_at_ms: i64,
}

impl SessionToken {
    /// Mint a fresh token issued now
    pub fn mint(now_ms: i64) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            issued_at_ms: now_ms,
        }
    }

    /// Encode and sign the token for transport in a cookie
    pub fn encode(&self, secret: &[u8; 32]) -> String {
        use base64::Engine;

        let payload = format!("{}.{}", self.session_id, self.issued_at_ms);
        let signature = sign(secret, payload.as_bytes());

        format!(
            "{}.{}",
            payload,
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
        )
    }

    /// Decode a token, verifying its signature
    ///
    /// Any structural defect or signature mismatch is `SessionInvalid`;
    /// expiry is a separate check so the caller can distinguish the two.
    pub fn decode(token: &str, secret: &[u8; 32]) -> SessionResult<Self> {
        use base64::Engine;
        use hmac::Mac;

        let (payload, signature_b64) = token.rsplit_once('.').ok_or(SessionError::SessionInvalid)?;

        let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| SessionError::SessionInvalid)?;

        let mut mac = new_mac(secret);
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::SessionInvalid)?;

        let (session_id, issued_at) = payload
            .split_once('.')
            .ok_or(SessionError::SessionInvalid)?;

        Ok(Self {
            session_id: session_id.parse().map_err(|_| SessionError::SessionInvalid)?,
            issued_at_ms: issued_at.parse().map_err(|_| SessionError::SessionInvalid)?,
        })
    }

    /// Whether the token's lifetime window has elapsed
    ///
    /// Expired exactly when `now >= issued_at + lifetime`. The check is
    /// against the issuance time, never against a client-supplied
    /// expiry.
    pub fn is_expired(&self, lifetime: Duration, now_ms: i64) -> bool {
        now_ms >= self.issued_at_ms + lifetime.as_millis() as i64
    }

    /// Lifetime left at `now_ms` (zero once expired)
    pub fn remaining(&self, lifetime: Duration, now_ms: i64) -> Duration {
        let expires_at_ms = self.issued_at_ms + lifetime.as_millis() as i64;
        Duration::from_millis(expires_at_ms.saturating_sub(now_ms).max(0) as u64)
    }

    /// Store key for this session's OTP record
    pub fn otp_key(&self) -> String {
        format!("otp:{}", self.session_id)
    }
}

type HmacSha256 = hmac::Hmac<sha2::Sha256>;

fn new_mac(secret: &[u8; 32]) -> HmacSha256 {
    use hmac::Mac;
    HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size")
}

fn sign(secret: &[u8; 32], payload: &[u8]) -> Vec<u8> {
    use hmac::Mac;
    let mut mac = new_mac(secret);
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];
    const NOW: i64 = 1_700_000_000_000;
    const LIFETIME: Duration = Duration::from_secs(60);

    #[test]
    fn test_encode_decode_roundtrip() {
        let token = SessionToken::mint(NOW);
        let encoded = token.encode(&SECRET);
        let decoded = SessionToken::decode(&encoded, &SECRET).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = SessionToken::mint(NOW).encode(&SECRET);
        let other_secret = [8u8; 32];
        assert!(matches!(
            SessionToken::decode(&token, &other_secret),
            Err(SessionError::SessionInvalid)
        ));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = SessionToken::mint(NOW).encode(&SECRET);
        // extend the issuance time without re-signing
        let tampered = token.replacen(&NOW.to_string(), &(NOW + 60_000).to_string(), 1);
        assert_ne!(token, tampered);
        assert!(matches!(
            SessionToken::decode(&tampered, &SECRET),
            Err(SessionError::SessionInvalid)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        for garbage in ["", "abc", "a.b", "a.b.c", "a.b.c.d"] {
            assert!(
                matches!(
                    SessionToken::decode(garbage, &SECRET),
                    Err(SessionError::SessionInvalid)
                ),
                "token {garbage:?}"
            );
        }
    }

    #[test]
    fn test_expiry_direction() {
        // Regression: the check must reject when now is at or past
        // issuance + lifetime, not the other way around
        let token = SessionToken::mint(NOW);

        assert!(!token.is_expired(LIFETIME, NOW));
        assert!(!token.is_expired(LIFETIME, NOW + 59_000));
        assert!(token.is_expired(LIFETIME, NOW + 60_000));
        assert!(token.is_expired(LIFETIME, NOW + 61_000));
    }

    #[test]
    fn test_remaining() {
        let token = SessionToken::mint(NOW);
        assert_eq!(token.remaining(LIFETIME, NOW), Duration::from_secs(60));
        assert_eq!(
            token.remaining(LIFETIME, NOW + 45_000),
            Duration::from_secs(15)
        );
        assert_eq!(token.remaining(LIFETIME, NOW + 61_000), Duration::ZERO);
    }

    #[test]
    fn test_otp_key_is_per_session() {
        let a = SessionToken::mint(NOW);
        let b = SessionToken::mint(NOW);
        assert_ne!(a.otp_key(), b.otp_key());
        assert!(a.otp_key().starts_with("otp:"));
    }
}
