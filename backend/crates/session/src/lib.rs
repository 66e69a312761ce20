//! Session/OTP Workflow Module
//!
//! Clean Architecture structure:
//! - `domain/` - Signed session tokens
//! - `application/` - Authenticate and OTP issuance use cases
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Short-lived session tokens minted on authentication, carried as an
//!   HttpOnly cookie and verified without server-side session tables
//! - One-time codes issued per session and reused verbatim while the
//!   session lives, so clients can poll safely
//! - Admission control on both endpoints (middleware and inline forms)
//!
//! ## Security Model
//! - Tokens are HMAC-SHA256 signed; issuance time travels inside the
//!   signed payload, so expiry cannot be extended by the client
//! - OTP state expires with the session (store TTL = remaining lifetime)
//! - Store access is bounded by a deadline; a timeout is reported as
//!   such, never as "no OTP exists yet"

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;


// Re-exports for convenience
pub use application::authenticate::{AuthenticateInput, AuthenticateOutcome, AuthenticateUseCase};
pub use application::config::SessionConfig;
pub use application::issue_otp::{IssueOtpUseCase, OtpIssuance};
pub use domain::token::SessionToken;
pub use error::{SessionError, SessionResult};
pub use presentation::handlers::SessionAppState;
pub use presentation::router::session_router;
