//! Time helpers for signing.

use chrono::{DateTime, Utc};

/// Current UTC time.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format as the credential scope date: `20220313`.
pub fn format_date(t: DateTime<Utc>) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format as the `x-amz-date` timestamp: `20220313T072004Z`.
pub fn format_iso8601(t: DateTime<Utc>) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}
