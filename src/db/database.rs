// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite connection wrapper.
//!
//! One `Database` owns the only connection a sync run uses. There is no
//! cross-process locking: callers must not run two syncs against the same
//! file at once.

use crate::db::schema::SCHEMA;
use crate::db::tables;
use crate::error::{AppError, Result};
use rusqlite::Connection;
use std::path::Path;

/// Local store.
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    /// Open or create the store at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Database(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            AppError::Database(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let db = Self { conn };
        db.initialize()?;
        tracing::debug!(path = %path.display(), "Opened local store");
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create tables and indexes. Safe to run against an existing store.
    pub fn initialize(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(|e| AppError::Database(format!("Schema initialization failed: {}", e)))
    }

    /// Row count of one of the store's tables.
    pub fn count_rows(&self, table: &str) -> Result<u64> {
        if !tables::ALL.contains(&table) {
            return Err(AppError::Database(format!("Unknown table: {}", table)));
        }
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(count as u64)
    }
}
