// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete profile and aggregate stats models.

use crate::error::{AppError, Result};
use crate::models::activity::record_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Athlete row in the `athlete` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteRow {
    /// Strava athlete ID (primary key)
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub sex: Option<String>,
    /// Profile picture URL
    pub profile: Option<String>,
    /// When the Strava account was created (ISO 8601)
    pub created_at: Option<String>,
    /// Weight in kilograms
    pub weight: Option<f64>,
    /// Functional threshold power in watts
    pub ftp: Option<i64>,
    /// Full serialized payload
    pub json_data: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AthleteFields {
    firstname: Option<String>,
    lastname: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    sex: Option<String>,
    profile: Option<String>,
    created_at: Option<String>,
    weight: Option<f64>,
    ftp: Option<i64>,
}

impl AthleteRow {
    /// Derive a row from the `/athlete` payload.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let id = record_id(raw, "athlete")?;
        let fields: AthleteFields = serde_json::from_value(raw.clone())
            .map_err(|e| AppError::InvalidRecord(format!("athlete {}: {}", id, e)))?;

        Ok(Self {
            id,
            firstname: fields.firstname.unwrap_or_default(),
            lastname: fields.lastname.unwrap_or_default(),
            city: fields.city,
            state: fields.state,
            country: fields.country,
            sex: fields.sex,
            profile: fields.profile,
            created_at: fields.created_at,
            weight: fields.weight,
            ftp: fields.ftp,
            json_data: raw.to_string(),
        })
    }

    /// "Firstname Lastname", trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

/// Aggregate stats row in the `athlete_stats` table (one per athlete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteStatsRow {
    pub athlete_id: i64,
    /// Longest ride in meters
    pub biggest_ride_distance: Option<f64>,
    /// Biggest climb in meters
    pub biggest_climb_elevation_gain: Option<f64>,
    pub json_data: String,
    /// When the stats were last fetched (unix seconds)
    pub updated_at: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatsFields {
    biggest_ride_distance: Option<f64>,
    biggest_climb_elevation_gain: Option<f64>,
}

impl AthleteStatsRow {
    /// Derive a row from the `/athletes/{id}/stats` payload, which carries
    /// no id of its own.
    pub fn from_raw(athlete_id: i64, raw: &Value, updated_at: i64) -> Result<Self> {
        let fields: StatsFields = serde_json::from_value(raw.clone()).map_err(|e| {
            AppError::InvalidRecord(format!("stats for athlete {}: {}", athlete_id, e))
        })?;

        Ok(Self {
            athlete_id,
            biggest_ride_distance: fields.biggest_ride_distance,
            biggest_climb_elevation_gain: fields.biggest_climb_elevation_gain,
            json_data: raw.to_string(),
            updated_at,
        })
    }
}
