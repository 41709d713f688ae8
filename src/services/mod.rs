// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - token lifecycle, API fetching and sync orchestration.

pub mod broker;
pub mod credentials;
pub mod strava;
pub mod sync;

pub use broker::{BrokerClient, TokenBroker, TokenExchange};
pub use credentials::CredentialManager;
pub use strava::{list_activities, PageLimit, StravaApi, StravaClient, ACTIVITIES_PER_PAGE};
pub use sync::{SyncService, SyncSummary};
