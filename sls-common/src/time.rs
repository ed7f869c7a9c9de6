//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current wall-clock time in whole seconds since the Unix epoch (UTC)
pub fn now_unix_secs() -> i64 {
    now().timestamp()
}
