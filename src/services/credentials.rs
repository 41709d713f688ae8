// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential manager: "give me an access token that works right now".
//!
//! 1. Use the stored credential if it is outside the expiry margin (no I/O
//!    beyond one SQLite read).
//! 2. Otherwise refresh through the broker with the stored refresh token,
//!    falling back to the configured bootstrap token.
//! 3. Append the new credential, rotated refresh token included.
//!
//! Broker failures are fatal for the run. Re-authorization needs a human in
//! a browser, so nothing here retries.

use crate::db::TokenStore;
use crate::error::{AppError, Result};
use crate::models::Credential;
use crate::services::broker::{TokenBroker, TokenExchange};
use crate::time_utils::unix_now;

/// Token lifecycle orchestration over a broker.
pub struct CredentialManager<B> {
    broker: B,
    fallback_refresh_token: Option<String>,
}

impl<B: TokenBroker> CredentialManager<B> {
    /// `fallback_refresh_token` is used only while the store is empty.
    pub fn new(broker: B, fallback_refresh_token: Option<String>) -> Self {
        Self {
            broker,
            fallback_refresh_token,
        }
    }

    /// Return a currently-valid access token.
    pub async fn ensure_valid<S: TokenStore>(&self, store: &S) -> Result<String> {
        Ok(self.valid_credential_at(store, unix_now()).await?.access_token)
    }

    /// Return a credential usable at `now`, refreshing if needed.
    pub async fn valid_credential_at<S: TokenStore>(
        &self,
        store: &S,
        now: i64,
    ) -> Result<Credential> {
        let current = store.get_current()?;

        if let Some(credential) = &current {
            if credential.is_usable_at(now) {
                return Ok(credential.clone());
            }
            tracing::info!(
                expires_at = credential.expires_at,
                "Stored access token expired or expiring, refreshing"
            );
        }

        let refresh_token = current
            .map(|c| c.refresh_token)
            .filter(|t| !t.is_empty())
            .or_else(|| self.fallback_refresh_token.clone())
            .ok_or(AppError::NoRefreshTokenAvailable)?;

        let credential = self.broker.refresh(&refresh_token).await?;
        store.put(&credential)?;
        Ok(credential)
    }

    /// First-time setup: exchange an authorization code and store the result.
    pub async fn authorize<S: TokenStore>(&self, store: &S, code: &str) -> Result<TokenExchange> {
        let exchange = self.broker.exchange_code(code).await?;
        store.put(&exchange.credential)?;
        Ok(exchange)
    }
}
