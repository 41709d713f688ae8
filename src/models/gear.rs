// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gear model. Gear only arrives embedded in the athlete payload.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gear discriminator stored in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearKind {
    Bike,
    Shoe,
}

impl GearKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GearKind::Bike => "bike",
            GearKind::Shoe => "shoe",
        }
    }

    /// Key of the athlete payload list holding this kind of gear.
    fn athlete_key(&self) -> &'static str {
        match self {
            GearKind::Bike => "bikes",
            GearKind::Shoe => "shoes",
        }
    }
}

/// One raw gear payload tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct GearRecord {
    pub kind: GearKind,
    pub raw: Value,
}

/// Collect the `bikes` and `shoes` lists of an athlete payload.
pub fn gear_from_athlete(athlete: &Value) -> Vec<GearRecord> {
    [GearKind::Bike, GearKind::Shoe]
        .into_iter()
        .flat_map(|kind| {
            athlete
                .get(kind.athlete_key())
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .map(move |raw| GearRecord {
                    kind,
                    raw: raw.clone(),
                })
        })
        .collect()
}

/// Gear row in the `gear` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearRow {
    /// Strava gear ID, e.g. "b1234" or "g5678" (primary key)
    pub id: String,
    pub name: String,
    pub kind: GearKind,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub description: Option<String>,
    /// Distance logged on this gear in meters
    pub distance: Option<f64>,
    pub json_data: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GearFields {
    id: Option<String>,
    name: Option<String>,
    brand_name: Option<String>,
    model_name: Option<String>,
    description: Option<String>,
    distance: Option<f64>,
}

impl GearRow {
    pub fn from_record(record: &GearRecord) -> Result<Self> {
        let fields: GearFields = serde_json::from_value(record.raw.clone())
            .map_err(|e| AppError::InvalidRecord(format!("{}: {}", record.kind.as_str(), e)))?;
        let id = fields
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                AppError::InvalidRecord(format!("{} payload has no id", record.kind.as_str()))
            })?;

        Ok(Self {
            id,
            name: fields.name.unwrap_or_default(),
            kind: record.kind,
            brand_name: fields.brand_name,
            model_name: fields.model_name,
            description: fields.description,
            distance: fields.distance,
            json_data: record.raw.to_string(),
        })
    }
}
