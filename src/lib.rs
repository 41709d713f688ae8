// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava Sync: mirror one athlete's Strava data into a local SQLite store
//!
//! OAuth refreshes go through a remote token service that holds the client
//! secret. Activities, the athlete profile, stats and gear are upserted
//! keyed by their Strava identifiers, so re-running a sync is always safe.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use error::Result;
use services::{BrokerClient, CredentialManager, StravaClient, SyncService};

/// Sync service wired to the real broker and Strava API.
pub type StravaSync = SyncService<StravaClient, BrokerClient>;

/// Build a sync service from configuration over an opened store.
pub fn build_sync_service(config: &Config, db: Database) -> Result<StravaSync> {
    let broker = BrokerClient::new(config)?;
    let api = StravaClient::new(config)?;
    let credentials = CredentialManager::new(broker, config.refresh_token.clone());
    Ok(SyncService::new(api, credentials, db))
}
