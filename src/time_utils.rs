// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as a unix timestamp (seconds).
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Format a unix timestamp as RFC3339 using a `Z` suffix.
///
/// Out-of-range timestamps are rendered as the raw number.
pub fn format_unix_rfc3339(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(date) => date.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => timestamp.to_string(),
    }
}
