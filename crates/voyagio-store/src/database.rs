// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! The [`Database`] struct IS the single writer: query modules accept `&Database`
//! and go through `connection().call()`. Do NOT create additional Connection
//! instances for writes.

use std::path::Path;

use tracing::debug;

use voyagio_core::VoyagioError;

/// Convert a tokio-rusqlite error into VoyagioError::Storage.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> VoyagioError {
    VoyagioError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite database, shared by all query modules.
///
/// Wraps a single `tokio_rusqlite::Connection` whose background thread
/// serializes every closure, eliminating SQLITE_BUSY under concurrency.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, VoyagioError> {
        Self::open_with(path, true).await
    }

    /// Open (or create) the database at `path`, choosing the journal mode,
    /// and run all pending migrations.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, VoyagioError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| VoyagioError::Storage {
                source: Box::new(e),
            })?;
        }

        // `open` fails with a bare rusqlite error, before any `call`
        // wrapping is involved.
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| VoyagioError::Storage {
                source: Box::new(e),
            })?;

        let journal = if wal_mode { "WAL" } else { "DELETE" };
        let pragmas = format!(
            "PRAGMA journal_mode = {journal};
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;"
        );
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(&pragmas)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| crate::migrations::run_migrations(conn))
            .await
            .map_err(|e| VoyagioError::Storage {
                source: Box::new(e),
            })?;

        debug!(path, journal, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), VoyagioError> {
        let Self { conn } = self;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
        conn.close().await.map_err(map_tr_err)?;
        Ok(())
    }
}
