// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Margin before expiry inside which a stored access token is not reused.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// An access/refresh token pair as stored in the `auth_token` log.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token for the Strava API
    pub access_token: String,
    /// Single-use refresh token; rotates on every refresh
    pub refresh_token: String,
    /// When the access token expires (unix seconds)
    pub expires_at: i64,
    /// When this row was recorded locally (unix seconds)
    pub created_at: i64,
}

impl Credential {
    /// Whether the access token can still be used at `now`.
    pub fn is_usable_at(&self, now: i64) -> bool {
        self.expires_at >= now + TOKEN_EXPIRY_MARGIN_SECS
    }
}

// Tokens must never end up in logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .finish()
    }
}
