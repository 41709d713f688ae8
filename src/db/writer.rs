// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upsert writer: maps Strava payloads into local rows.
//!
//! Every write is `INSERT OR REPLACE` keyed by the Strava identifier, so a
//! later payload always fully supersedes an earlier one (no field merge).
//! Batches commit once; a record that fails to map or write is logged and
//! skipped without failing the batch.

use crate::db::Database;
use crate::error::Result;
use crate::models::{ActivityRow, AthleteRow, AthleteStatsRow, GearKind, GearRecord, GearRow};
use rusqlite::{params, OptionalExtension, Statement};
use serde_json::Value;

const UPSERT_ACTIVITY: &str = "INSERT OR REPLACE INTO activities
    (id, name, type, sport_type, start_date, distance, moving_time, elapsed_time,
     total_elevation_gain, average_speed, max_speed, has_heartrate,
     average_heartrate, max_heartrate, kudos_count, achievement_count, pr_count, json_data)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)";

const UPSERT_GEAR: &str = "INSERT OR REPLACE INTO gear
    (id, name, type, brand_name, model_name, description, distance, json_data)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// Outcome of a batch upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertReport {
    /// Records inserted or replaced
    pub written: usize,
    /// Records that failed to map or write
    pub skipped: usize,
}

impl UpsertReport {
    pub fn merge(&mut self, other: UpsertReport) {
        self.written += other.written;
        self.skipped += other.skipped;
    }
}

impl Database {
    // ─── Activities ──────────────────────────────────────────────

    /// Upsert a batch of raw activity payloads in one transaction.
    pub fn upsert_activities(&mut self, records: &[Value]) -> Result<UpsertReport> {
        let tx = self.conn.transaction()?;
        let mut report = UpsertReport::default();
        {
            let mut stmt = tx.prepare(UPSERT_ACTIVITY)?;
            for raw in records {
                let outcome =
                    ActivityRow::from_raw(raw).and_then(|row| execute_activity(&mut stmt, &row));
                match outcome {
                    Ok(()) => report.written += 1,
                    Err(e) => {
                        tracing::error!(
                            activity_id = ?raw.get("id"),
                            error = %e,
                            "Failed to save activity, skipping"
                        );
                        report.skipped += 1;
                    }
                }
            }
        }
        tx.commit()?;

        tracing::debug!(
            written = report.written,
            skipped = report.skipped,
            "Committed activity batch"
        );
        Ok(report)
    }

    /// Upsert a single activity (e.g. a detail fetch). Failures are returned.
    pub fn upsert_activity(&self, raw: &Value) -> Result<ActivityRow> {
        let row = ActivityRow::from_raw(raw)?;
        let mut stmt = self.conn.prepare_cached(UPSERT_ACTIVITY)?;
        execute_activity(&mut stmt, &row)?;
        Ok(row)
    }

    /// Read back a stored activity.
    pub fn get_activity(&self, id: i64) -> Result<Option<ActivityRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, type, sport_type, start_date, distance, moving_time,
                 elapsed_time, total_elevation_gain, average_speed, max_speed, has_heartrate,
                 average_heartrate, max_heartrate, kudos_count, achievement_count, pr_count,
                 json_data
                 FROM activities WHERE id = ?1",
                params![id],
                |row| {
                    Ok(ActivityRow {
                        id: row.get(0)?,
                        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        activity_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        sport_type: row.get(3)?,
                        start_date: row.get(4)?,
                        distance: row.get(5)?,
                        moving_time: row.get(6)?,
                        elapsed_time: row.get(7)?,
                        total_elevation_gain: row.get(8)?,
                        average_speed: row.get(9)?,
                        max_speed: row.get(10)?,
                        has_heartrate: row.get(11)?,
                        average_heartrate: row.get(12)?,
                        max_heartrate: row.get(13)?,
                        kudos_count: row.get(14)?,
                        achievement_count: row.get(15)?,
                        pr_count: row.get(16)?,
                        json_data: row.get(17)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    // ─── Athlete ─────────────────────────────────────────────────

    /// Upsert the athlete profile.
    pub fn upsert_athlete(&self, raw: &Value) -> Result<AthleteRow> {
        let row = AthleteRow::from_raw(raw)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO athlete
             (id, firstname, lastname, city, state, country, sex, profile, created_at,
              weight, ftp, json_data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                row.id,
                row.firstname,
                row.lastname,
                row.city,
                row.state,
                row.country,
                row.sex,
                row.profile,
                row.created_at,
                row.weight,
                row.ftp,
                row.json_data,
            ],
        )?;
        Ok(row)
    }

    /// Upsert the aggregate stats of one athlete.
    pub fn upsert_athlete_stats(
        &self,
        athlete_id: i64,
        raw: &Value,
        updated_at: i64,
    ) -> Result<AthleteStatsRow> {
        let row = AthleteStatsRow::from_raw(athlete_id, raw, updated_at)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO athlete_stats
             (athlete_id, biggest_ride_distance, biggest_climb_elevation_gain, json_data, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.athlete_id,
                row.biggest_ride_distance,
                row.biggest_climb_elevation_gain,
                row.json_data,
                row.updated_at,
            ],
        )?;
        Ok(row)
    }

    // ─── Gear ────────────────────────────────────────────────────

    /// Upsert bikes and shoes in one transaction.
    pub fn upsert_gear(&mut self, records: &[GearRecord]) -> Result<UpsertReport> {
        let tx = self.conn.transaction()?;
        let mut report = UpsertReport::default();
        {
            let mut stmt = tx.prepare(UPSERT_GEAR)?;
            for record in records {
                let outcome =
                    GearRow::from_record(record).and_then(|row| execute_gear(&mut stmt, &row));
                match outcome {
                    Ok(()) => report.written += 1,
                    Err(e) => {
                        tracing::error!(
                            gear_id = ?record.raw.get("id"),
                            kind = record.kind.as_str(),
                            error = %e,
                            "Failed to save gear, skipping"
                        );
                        report.skipped += 1;
                    }
                }
            }
        }
        tx.commit()?;
        Ok(report)
    }

    /// Read back the discriminator of a stored gear item.
    pub fn gear_kind(&self, id: &str) -> Result<Option<GearKind>> {
        let kind: Option<String> = self
            .conn
            .query_row("SELECT type FROM gear WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(kind.and_then(|k| match k.as_str() {
            "bike" => Some(GearKind::Bike),
            "shoe" => Some(GearKind::Shoe),
            _ => None,
        }))
    }
}

fn execute_activity(stmt: &mut Statement<'_>, row: &ActivityRow) -> Result<()> {
    stmt.execute(params![
        row.id,
        row.name,
        row.activity_type,
        row.sport_type,
        row.start_date,
        row.distance,
        row.moving_time,
        row.elapsed_time,
        row.total_elevation_gain,
        row.average_speed,
        row.max_speed,
        row.has_heartrate,
        row.average_heartrate,
        row.max_heartrate,
        row.kudos_count,
        row.achievement_count,
        row.pr_count,
        row.json_data,
    ])?;
    Ok(())
}

fn execute_gear(stmt: &mut Statement<'_>, row: &GearRow) -> Result<()> {
    stmt.execute(params![
        row.id,
        row.name,
        row.kind.as_str(),
        row.brand_name,
        row.model_name,
        row.description,
        row.distance,
        row.json_data,
    ])?;
    Ok(())
}
