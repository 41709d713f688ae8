// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored. The confidential
//! client secret is never part of this configuration: it lives on the
//! token service.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default Strava API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://www.strava.com/api/v3";

/// Placeholder URL shipped in setup templates; treated as "not configured".
const PLACEHOLDER_TOKEN_SERVICE_URL: &str = "https://your-strava-mcp-service.vercel.app";

/// Strava OAuth consent page.
pub const STRAVA_AUTHORIZE_URL: &str = "https://www.strava.com/oauth/authorize";

/// Scopes the sync needs: private activities and the full profile.
pub const OAUTH_SCOPES: &str = "activity:read_all,profile:read_all";

/// Pages fetched by a non-full sync when nothing else is configured.
pub const DEFAULT_PAGE_LIMIT: u32 = 30;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Sync configuration, threaded explicitly into each component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub client_id: String,
    /// Refresh token used when the store holds no credential yet
    pub refresh_token: Option<String>,
    /// Base URL of the token exchange service
    pub token_service_url: String,
    /// Strava API base URL
    pub api_base_url: String,
    /// Timeout applied to every outbound request
    pub request_timeout: Duration,
    /// Location of the SQLite store
    pub db_path: PathBuf,
    /// Pages fetched by a non-full sync
    pub page_limit: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let token_service_url = env::var("STRAVA_TOKEN_SERVICE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .map_err(|_| ConfigError::Missing("STRAVA_TOKEN_SERVICE_URL"))?;
        if token_service_url.is_empty() || token_service_url == PLACEHOLDER_TOKEN_SERVICE_URL {
            return Err(ConfigError::Missing("STRAVA_TOKEN_SERVICE_URL"));
        }

        let db_path = Self::db_path_from_env()?;

        Ok(Self {
            client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            refresh_token: env::var("STRAVA_REFRESH_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            token_service_url,
            api_base_url: env::var("STRAVA_API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(parse_var(
                "STRAVA_REQUEST_TIMEOUT",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            db_path,
            page_limit: parse_var("STRAVA_PAGE_LIMIT", DEFAULT_PAGE_LIMIT)?,
        })
    }

    /// Resolve only the store location. Needs none of the remote settings.
    pub fn db_path_from_env() -> Result<PathBuf, ConfigError> {
        dotenvy::dotenv().ok();

        match env::var("STRAVA_DB_PATH") {
            Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path.trim())),
            _ => default_db_path(),
        }
    }

    /// Strava consent URL for this client. Strava redirects to the token
    /// service's `/callback`, which shows the code for `exchange-code`.
    pub fn authorize_url(&self) -> Result<String, ConfigError> {
        let redirect_uri = format!("{}/callback", self.token_service_url);
        let url = reqwest::Url::parse_with_params(
            STRAVA_AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", redirect_uri.as_str()),
                ("approval_prompt", "auto"),
                ("scope", OAUTH_SCOPES),
            ],
        )
        .map_err(|_| ConfigError::Invalid {
            name: "STRAVA_TOKEN_SERVICE_URL",
            value: self.token_service_url.clone(),
        })?;
        Ok(url.into())
    }

    /// Config pointing at local fakes, for tests.
    pub fn test_default(token_service_url: &str, api_base_url: &str) -> Self {
        Self {
            client_id: "test_client_id".to_string(),
            refresh_token: Some("bootstrap_refresh_token".to_string()),
            token_service_url: token_service_url.trim_end_matches('/').to_string(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
            db_path: PathBuf::from(":memory:"),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// `~/.strava_mcp/strava_data.db`
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = directories::BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(dirs.home_dir().join(".strava_mcp").join("strava_data.db"))
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Could not determine home directory for the default database path")]
    NoHomeDirectory,
}
