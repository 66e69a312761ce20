//! Limiter Categories and Rate Specifications

use std::fmt;
use std::time::Duration;

/// Endpoint category, each with its own counter partition and rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimiterCategory {
    Authenticate,
    OtpIssuance,
    Get,
    Post,
    Upload,
}

impl LimiterCategory {
    pub const ALL: [LimiterCategory; 5] = [
        LimiterCategory::Authenticate,
        LimiterCategory::OtpIssuance,
        LimiterCategory::Get,
        LimiterCategory::Post,
        LimiterCategory::Upload,
    ];

    /// Short tag used in limit-key construction
    pub const fn tag(&self) -> &'static str {
        match self {
            LimiterCategory::Authenticate => "auth",
            LimiterCategory::OtpIssuance => "otp",
            LimiterCategory::Get => "get",
            LimiterCategory::Post => "post",
            LimiterCategory::Upload => "upl",
        }
    }

    /// Environment variable holding this category's rate override
    pub const fn env_var(&self) -> &'static str {
        match self {
            LimiterCategory::Authenticate => "AUTHENTICATE",
            LimiterCategory::OtpIssuance => "OTP_ISSUANCE",
            LimiterCategory::Get => "GET",
            LimiterCategory::Post => "POST",
            LimiterCategory::Upload => "UPLOAD",
        }
    }

    /// Fixed window paired with any override quantity for this category
    pub const fn window(&self) -> Window {
        match self {
            LimiterCategory::Authenticate | LimiterCategory::Get => Window::PerHour,
            LimiterCategory::OtpIssuance | LimiterCategory::Post | LimiterCategory::Upload => {
                Window::PerMinute
            }
        }
    }

    /// Built-in default rate
    ///
    /// Upload has no default: selecting it without an environment
    /// override must fail loudly, never fall back to a zero rate.
    pub const fn default_spec(&self) -> Option<RateSpec> {
        match self {
            LimiterCategory::Authenticate => Some(RateSpec::per_hour(10)),
            LimiterCategory::OtpIssuance => Some(RateSpec::per_minute(5)),
            LimiterCategory::Get => Some(RateSpec::per_hour(100)),
            LimiterCategory::Post => Some(RateSpec::per_minute(2)),
            LimiterCategory::Upload => None,
        }
    }
}

impl fmt::Display for LimiterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LimiterCategory::Authenticate => "Authenticate",
            LimiterCategory::OtpIssuance => "OtpIssuance",
            LimiterCategory::Get => "Get",
            LimiterCategory::Post => "Post",
            LimiterCategory::Upload => "Upload",
        };
        write!(f, "{name}")
    }
}

/// Rate window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    PerMinute,
    PerHour,
}

impl Window {
    pub const fn duration(&self) -> Duration {
        match self {
            Window::PerMinute => Duration::from_secs(60),
            Window::PerHour => Duration::from_secs(3600),
        }
    }

    pub const fn as_millis(&self) -> u64 {
        self.duration().as_millis() as u64
    }
}

/// Rate specification: `quantity` requests per `window`
///
/// Invariant: quantity > 0. Constructed through [`RateSpec::per_minute`]
/// / [`RateSpec::per_hour`] or the resolver, both of which enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateSpec {
    pub quantity: u32,
    pub window: Window,
}

impl RateSpec {
    pub const fn per_minute(quantity: u32) -> Self {
        assert!(quantity > 0, "rate quantity must be positive");
        Self {
            quantity,
            window: Window::PerMinute,
        }
    }

    pub const fn per_hour(quantity: u32) -> Self {
        assert!(quantity > 0, "rate quantity must be positive");
        Self {
            quantity,
            window: Window::PerHour,
        }
    }

    /// Interval between steadily emitted requests, in milliseconds
    ///
    /// This is the GCRA emission interval: window / quantity.
    pub fn emission_interval_ms(&self) -> u64 {
        (self.window.as_millis() / self.quantity as u64).max(1)
    }
}

impl fmt::Display for RateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.window {
            Window::PerMinute => "minute",
            Window::PerHour => "hour",
        };
        write!(f, "{}/{}", self.quantity, unit)
    }
}
