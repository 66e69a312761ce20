//! Limit Keys
//!
//! A limit key uniquely partitions the counter space by
//! (category, client). Two different clients in the same category must
//! never collide, and the same client must never collide across
//! categories.

use crate::domain::category::LimiterCategory;
use std::fmt;

/// Separator between the category tag and the client identifier.
///
/// `~` cannot occur in an IP address (the usual client identifier).
/// Caller-supplied identifiers are percent-escaped, `%` itself first,
/// so the mapping (category, client) -> key stays injective even for
/// ids that already contain escape sequences.
const SEPARATOR: char = '~';

/// Backend key for one (category, client) counter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LimitKey(String);

impl LimitKey {
    /// Build the key for a category and client identifier
    pub fn new(category: LimiterCategory, client_id: &str) -> Self {
        let escaped;
        let client_id = if client_id.contains(SEPARATOR) || client_id.contains('%') {
            escaped = client_id.replace('%', "%25").replace(SEPARATOR, "%7E");
            escaped.as_str()
        } else {
            client_id
        };
        Self(format!("{}{}{}", category.tag(), SEPARATOR, client_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
