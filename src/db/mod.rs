// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local SQLite store.

pub mod database;
pub mod schema;
pub mod tokens;
pub mod writer;

pub use database::Database;
pub use tokens::TokenStore;
pub use writer::UpsertReport;

/// Table names as constants.
pub mod tables {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const ACTIVITIES: &str = "activities";
    pub const ATHLETE: &str = "athlete";
    pub const ATHLETE_STATS: &str = "athlete_stats";
    pub const GEAR: &str = "gear";

    /// Every table the schema creates.
    pub const ALL: [&str; 5] = [AUTH_TOKEN, ACTIVITIES, ATHLETE, ATHLETE_STATS, GEAR];
}
