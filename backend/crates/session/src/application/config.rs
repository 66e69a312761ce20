//! Session Configuration

use std::time::Duration;

use platform::cookie::CookieConfig;

/// Session workflow configuration
///
/// ## Fields
/// * `cookie` - Cookie attributes for the session token
/// * `session_secret` - HMAC key for token signatures
/// * `session_lifetime` - How long a minted session stays valid
/// * `store_timeout` - Deadline for every key-value store call
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie: CookieConfig,
    pub session_secret: [u8; 32],
    pub session_lifetime: Duration,
    pub store_timeout: Duration,
}

impl SessionConfig {
    pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(60);
    pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

    pub fn new(session_secret: [u8; 32]) -> Self {
        Self {
            cookie: CookieConfig::default(),
            session_secret,
            session_lifetime: Self::DEFAULT_SESSION_LIFETIME,
            store_timeout: Self::DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Configuration with a freshly generated secret
    ///
    /// 再起動でシークレットが変わり既存セッションは無効になるため、
    /// 単一インスタンスの開発用途に限る。
    pub fn with_random_secret() -> Self {
        use rand::RngCore;

        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::new(secret)
    }

    /// Development configuration (cookies usable over plain HTTP)
    pub fn development() -> Self {
        let mut config = Self::with_random_secret();
        config.cookie.secure = false;
        config
    }
}
