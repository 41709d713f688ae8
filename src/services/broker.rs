// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token broker client.
//!
//! The broker is a small remote service that holds the Strava client secret
//! and performs the OAuth grant on our behalf:
//! - `POST /refresh-token` `{refresh_token}`
//! - `POST /exchange-token` `{code}`
//!
//! Both answer `{access_token, refresh_token, expires_at}` (plus an optional
//! `athlete` summary for the code exchange). No retries happen here.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Credential;
use crate::time_utils::unix_now;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;

/// Exchanges OAuth grants for fresh credentials.
pub trait TokenBroker {
    /// Trade a refresh token for a new credential. Strava rotates the
    /// refresh token, so the returned one supersedes the argument.
    fn refresh(&self, refresh_token: &str) -> impl Future<Output = Result<Credential>> + Send;

    /// Trade a one-time authorization code for the first credential.
    fn exchange_code(&self, code: &str) -> impl Future<Output = Result<TokenExchange>> + Send;
}

/// Result of an authorization-code exchange.
#[derive(Debug, Clone)]
pub struct TokenExchange {
    pub credential: Credential,
    /// Athlete summary, when the broker forwards it
    pub athlete: Option<Value>,
}

/// Wire shape of a broker reply. Fields are optional so that a missing one
/// is reported as a malformed response rather than a parse error.
#[derive(Debug, Deserialize)]
struct BrokerTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    #[serde(default)]
    athlete: Option<Value>,
}

impl BrokerTokenResponse {
    fn into_exchange(self) -> Result<TokenExchange> {
        let access_token = required(self.access_token, "access_token")?;
        let refresh_token = required(self.refresh_token, "refresh_token")?;
        let expires_at = self
            .expires_at
            .ok_or_else(|| AppError::MalformedResponse("missing expires_at".to_string()))?;

        Ok(TokenExchange {
            credential: Credential {
                access_token,
                refresh_token,
                expires_at,
                created_at: unix_now(),
            },
            athlete: self.athlete.filter(|a| !a.is_null()),
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::MalformedResponse(format!("missing {}", field)))
}

/// HTTP client for the token broker.
#[derive(Clone)]
pub struct BrokerClient {
    http: reqwest::Client,
    base_url: String,
}

impl BrokerClient {
    /// Create a broker client bounded by the configured request timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.token_service_url.clone(),
        })
    }

    /// POST a JSON grant and parse the token reply.
    async fn post_grant(&self, path: &str, body: Value) -> Result<TokenExchange> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::BrokerUnavailable(format!("{} request failed: {}", path, e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AppError::BrokerUnavailable(format!("{} response unreadable: {}", path, e))
        })?;

        if status != StatusCode::OK {
            tracing::warn!(status = %status, path, "Token service returned an error");
            return Err(classify_failure(status, &text));
        }

        let parsed: BrokerTokenResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::MalformedResponse(format!("{} body is not a token reply: {}", path, e)))?;
        parsed.into_exchange()
    }
}

/// The broker answers 4xx when Strava refused the grant and 5xx when it
/// failed itself. 429 is its own rate limit.
fn classify_failure(status: StatusCode, body: &str) -> AppError {
    let detail = format!("HTTP {}: {}", status, body);
    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        AppError::TokenRejected(detail)
    } else {
        AppError::BrokerUnavailable(detail)
    }
}

impl TokenBroker for BrokerClient {
    async fn refresh(&self, refresh_token: &str) -> Result<Credential> {
        let exchange = self
            .post_grant(
                "refresh-token",
                serde_json::json!({ "refresh_token": refresh_token }),
            )
            .await?;
        tracing::info!(
            expires_at = exchange.credential.expires_at,
            "Access token refreshed via token service"
        );
        Ok(exchange.credential)
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenExchange> {
        let exchange = self
            .post_grant("exchange-token", serde_json::json!({ "code": code }))
            .await?;
        tracing::info!(
            athlete_id = ?exchange.athlete.as_ref().and_then(|a| a.get("id")),
            "Authorization code exchanged via token service"
        );
        Ok(exchange)
    }
}
