// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by the sync engine and the CLI.

use crate::config::ConfigError;

/// Application error type.
///
/// Everything except `InvalidRecord` aborts the current sync run. Record
/// level failures are logged by the writer and never reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No refresh token available; re-run setup to authorize this installation")]
    NoRefreshTokenAvailable,

    #[error("Token service unavailable: {0}")]
    BrokerUnavailable(String),

    #[error("Refresh token rejected: {0}")]
    TokenRejected(String),

    #[error("Malformed token service response: {0}")]
    MalformedResponse(String),

    #[error("Strava API request failed ({}): {body}", status_label(.status))]
    ApiRequestFailed { status: Option<u16>, body: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {}", code),
        None => "no response".to_string(),
    }
}

impl AppError {
    /// Whether the operator must go through the browser authorization
    /// flow again before another sync can succeed.
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self,
            AppError::NoRefreshTokenAvailable | AppError::TokenRejected(_)
        )
    }

    /// Whether simply re-running the sync later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::BrokerUnavailable(_) => true,
            AppError::ApiRequestFailed { status: None, .. } => true,
            AppError::ApiRequestFailed {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;
