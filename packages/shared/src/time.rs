//! Time-related utilities with clock abstraction for testability.
//!
//! All timestamps are Unix epoch milliseconds in UTC.

use chrono::{DateTime, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_timestamp_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to RFC 3339 format.
///
/// Out-of-range values collapse to the Unix epoch.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    to_datetime(timestamp_millis).to_rfc3339()
}

/// Render the wall-clock part of a timestamp as `HH:MM`, the format chat
/// bubbles display next to each message.
pub fn format_time_of_day(timestamp_millis: i64) -> String {
    to_datetime(timestamp_millis).format("%H:%M").to_string()
}

fn to_datetime(timestamp_millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp_millis).unwrap_or_default()
}
