// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token store: an append-only, latest-wins log of credentials.

use crate::db::Database;
use crate::error::Result;
use crate::models::Credential;
use rusqlite::{params, OptionalExtension};

/// Durable credential storage.
pub trait TokenStore {
    /// The most recently recorded credential, if any.
    fn get_current(&self) -> Result<Option<Credential>>;

    /// Append a credential. Earlier rows are kept as history.
    fn put(&self, credential: &Credential) -> Result<()>;
}

impl TokenStore for Database {
    fn get_current(&self) -> Result<Option<Credential>> {
        // `created_at` has one-second resolution; `id` orders same-second writes.
        let credential = self
            .conn
            .query_row(
                "SELECT access_token, refresh_token, expires_at, created_at
                 FROM auth_token
                 ORDER BY created_at DESC, id DESC
                 LIMIT 1",
                [],
                |row| {
                    Ok(Credential {
                        access_token: row.get(0)?,
                        refresh_token: row.get(1)?,
                        expires_at: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(credential)
    }

    fn put(&self, credential: &Credential) -> Result<()> {
        self.conn.execute(
            "INSERT INTO auth_token (access_token, refresh_token, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                credential.access_token,
                credential.refresh_token,
                credential.expires_at,
                credential.created_at,
            ],
        )?;
        tracing::debug!(expires_at = credential.expires_at, "Stored credential");
        Ok(())
    }
}
