//! Process-lifetime asset version token.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Cache-busting token appended to asset URLs as `?v=<token>`.
///
/// Captured once at startup and handed to the assembler; every request sees
/// the same value until the process restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionToken(u128);

impl VersionToken {
    /// Capture the current time in milliseconds since the Unix epoch.
    pub fn capture() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self(millis)
    }

    pub fn from_millis(millis: u128) -> Self {
        Self(millis)
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
