// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database schema. Every statement is idempotent and runs on each open.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS auth_token (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    access_token TEXT NOT NULL,
    refresh_token TEXT NOT NULL,
    expires_at INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY,
    name TEXT,
    type TEXT,
    sport_type TEXT,
    start_date TEXT,
    distance REAL,
    moving_time INTEGER,
    elapsed_time INTEGER,
    total_elevation_gain REAL,
    average_speed REAL,
    max_speed REAL,
    has_heartrate BOOLEAN,
    average_heartrate REAL,
    max_heartrate REAL,
    kudos_count INTEGER,
    achievement_count INTEGER,
    pr_count INTEGER,
    json_data TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS athlete (
    id INTEGER PRIMARY KEY,
    firstname TEXT,
    lastname TEXT,
    city TEXT,
    state TEXT,
    country TEXT,
    sex TEXT,
    profile TEXT,
    created_at TEXT,
    weight REAL,
    ftp INTEGER,
    json_data TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS athlete_stats (
    athlete_id INTEGER PRIMARY KEY,
    biggest_ride_distance REAL,
    biggest_climb_elevation_gain REAL,
    json_data TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS gear (
    id TEXT PRIMARY KEY,
    name TEXT,
    type TEXT NOT NULL CHECK (type IN ('bike', 'shoe')),
    brand_name TEXT,
    model_name TEXT,
    description TEXT,
    distance REAL,
    json_data TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_auth_token_created ON auth_token(created_at);
CREATE INDEX IF NOT EXISTS idx_activities_type ON activities(type);
CREATE INDEX IF NOT EXISTS idx_activities_date ON activities(start_date);
CREATE INDEX IF NOT EXISTS idx_activities_distance ON activities(distance);
"#;
