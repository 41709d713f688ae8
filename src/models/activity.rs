// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity model for local storage.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Activity row in the `activities` table.
///
/// Every column except `json_data` is derived from the raw payload, so the
/// row can be regenerated from `json_data` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRow {
    /// Strava activity ID (primary key)
    pub id: i64,
    /// Activity name/title
    pub name: String,
    /// Legacy activity type (Ride, Run, ...)
    pub activity_type: String,
    /// Sport type (Ride, MountainBikeRide, TrailRun, ...)
    pub sport_type: Option<String>,
    /// Start date/time (ISO 8601)
    pub start_date: Option<String>,
    /// Distance in meters
    pub distance: Option<f64>,
    /// Moving time in seconds
    pub moving_time: Option<i64>,
    /// Elapsed time in seconds
    pub elapsed_time: Option<i64>,
    /// Elevation gain in meters
    pub total_elevation_gain: Option<f64>,
    /// Average speed in m/s
    pub average_speed: Option<f64>,
    /// Max speed in m/s
    pub max_speed: Option<f64>,
    pub has_heartrate: Option<bool>,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    pub kudos_count: Option<i64>,
    pub achievement_count: Option<i64>,
    pub pr_count: Option<i64>,
    /// Full serialized payload
    pub json_data: String,
}

/// Promoted fields as they appear in the Strava payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ActivityFields {
    name: Option<String>,
    #[serde(rename = "type")]
    activity_type: Option<String>,
    sport_type: Option<String>,
    start_date: Option<String>,
    distance: Option<f64>,
    moving_time: Option<i64>,
    elapsed_time: Option<i64>,
    total_elevation_gain: Option<f64>,
    average_speed: Option<f64>,
    max_speed: Option<f64>,
    has_heartrate: Option<bool>,
    average_heartrate: Option<f64>,
    max_heartrate: Option<f64>,
    kudos_count: Option<i64>,
    achievement_count: Option<i64>,
    pr_count: Option<i64>,
}

impl ActivityRow {
    /// Derive a row from a summary or detailed activity payload.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let id = record_id(raw, "activity")?;
        let fields: ActivityFields = serde_json::from_value(raw.clone())
            .map_err(|e| AppError::InvalidRecord(format!("activity {}: {}", id, e)))?;

        Ok(Self {
            id,
            name: fields.name.unwrap_or_default(),
            activity_type: fields.activity_type.unwrap_or_default(),
            sport_type: fields.sport_type,
            start_date: fields.start_date,
            distance: fields.distance,
            moving_time: fields.moving_time,
            elapsed_time: fields.elapsed_time,
            total_elevation_gain: fields.total_elevation_gain,
            average_speed: fields.average_speed,
            max_speed: fields.max_speed,
            has_heartrate: fields.has_heartrate,
            average_heartrate: fields.average_heartrate,
            max_heartrate: fields.max_heartrate,
            kudos_count: fields.kudos_count,
            achievement_count: fields.achievement_count,
            pr_count: fields.pr_count,
            json_data: raw.to_string(),
        })
    }
}

/// Extract the integer `id` every Strava resource carries.
pub(crate) fn record_id(raw: &Value, kind: &str) -> Result<i64> {
    raw.get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| AppError::InvalidRecord(format!("{} payload has no integer id", kind)))
}
