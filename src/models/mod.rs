// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the local store.

pub mod activity;
pub mod athlete;
pub mod credential;
pub mod gear;

pub use activity::ActivityRow;
pub use athlete::{AthleteRow, AthleteStatsRow};
pub use credential::{Credential, TOKEN_EXPIRY_MARGIN_SECS};
pub use gear::{gear_from_athlete, GearKind, GearRecord, GearRow};
