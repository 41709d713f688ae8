// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync driver.
//!
//! Handles the core workflow:
//! 1. Obtain a valid access token (refreshing through the broker if needed)
//! 2. Fetch and store the athlete profile, stats and gear
//! 3. Page through activities, committing each page as one batch
//!
//! Everything runs sequentially. A failed run keeps the pages it already
//! committed; re-running is safe because every write is an upsert.

use crate::db::{Database, UpsertReport};
use crate::error::Result;
use crate::models::{gear_from_athlete, ActivityRow};
use crate::services::broker::{TokenBroker, TokenExchange};
use crate::services::credentials::CredentialManager;
use crate::services::strava::{for_each_activity_page, PageLimit, StravaApi};
use crate::time_utils::unix_now;

/// Outcome of a full or partial sync.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSummary {
    pub athlete_id: i64,
    pub athlete_name: String,
    /// Whether the athlete stats endpoint succeeded
    pub stats_synced: bool,
    pub gear: UpsertReport,
    /// Activity records received from the API
    pub activities_fetched: usize,
    pub activities: UpsertReport,
    /// Expiry of the credential used for this run (unix seconds)
    pub token_expires_at: i64,
}

/// Orchestrates credentials, API fetching and the local store.
pub struct SyncService<A, B> {
    api: A,
    credentials: CredentialManager<B>,
    db: Database,
}

impl<A: StravaApi, B: TokenBroker> SyncService<A, B> {
    pub fn new(api: A, credentials: CredentialManager<B>, db: Database) -> Self {
        Self {
            api,
            credentials,
            db,
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Sync the athlete (profile, stats, gear) and up to `limit` pages of
    /// activities.
    pub async fn sync(&mut self, limit: PageLimit) -> Result<SyncSummary> {
        let credential = self
            .credentials
            .valid_credential_at(&self.db, unix_now())
            .await?;
        let token = credential.access_token.as_str();

        tracing::info!("Fetching athlete data from Strava API");
        let athlete_raw = self.api.get_athlete(token).await?;
        let athlete = self.db.upsert_athlete(&athlete_raw)?;
        tracing::info!(athlete_id = athlete.id, "Saved athlete profile");

        // Stats are refreshed independently; a failure here does not stop the sync.
        let stats_synced = match self.api.get_athlete_stats(token, athlete.id).await {
            Ok(stats_raw) => match self.db.upsert_athlete_stats(athlete.id, &stats_raw, unix_now()) {
                Ok(_) => true,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to save athlete stats");
                    false
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch athlete stats");
                false
            }
        };

        let gear = self.db.upsert_gear(&gear_from_athlete(&athlete_raw))?;
        tracing::info!(written = gear.written, skipped = gear.skipped, "Saved gear");

        let db = &mut self.db;
        let mut activities = UpsertReport::default();
        let activities_fetched = for_each_activity_page(&self.api, token, limit, |page, batch| {
            let report = db.upsert_activities(&batch)?;
            tracing::debug!(page, written = report.written, "Committed activity page");
            activities.merge(report);
            Ok(())
        })
        .await?;

        tracing::info!(
            fetched = activities_fetched,
            written = activities.written,
            skipped = activities.skipped,
            "Sync complete"
        );

        Ok(SyncSummary {
            athlete_id: athlete.id,
            athlete_name: athlete.display_name(),
            stats_synced,
            gear,
            activities_fetched,
            activities,
            token_expires_at: credential.expires_at,
        })
    }

    /// Fetch one activity's detail payload and upsert it, replacing any
    /// summary-only version.
    pub async fn sync_one_activity(&mut self, activity_id: i64) -> Result<ActivityRow> {
        let token = self.credentials.ensure_valid(&self.db).await?;

        tracing::info!(activity_id, "Fetching detailed activity data");
        let raw = self.api.get_activity(&token, activity_id).await?;
        let row = self.db.upsert_activity(&raw)?;

        tracing::info!(activity_id = row.id, "Saved detailed activity data");
        Ok(row)
    }

    /// Exchange an authorization code and store the first credential.
    pub async fn authorize(&mut self, code: &str) -> Result<TokenExchange> {
        self.credentials.authorize(&self.db, code).await
    }
}
