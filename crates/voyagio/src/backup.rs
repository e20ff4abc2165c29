// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `voyagio backup` and `voyagio restore` command implementation.
//!
//! Uses rusqlite's Backup API for atomic, consistent copies that work
//! even while the database is being written to in WAL mode.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use voyagio_core::VoyagioError;

fn storage_err(e: impl std::error::Error + Send + Sync + 'static) -> VoyagioError {
    VoyagioError::Storage {
        source: Box::new(e),
    }
}

/// Run a backup of the trip database to the specified path.
pub fn run_backup(db_path: &str, backup_path: &str) -> Result<(), VoyagioError> {
    let src_path = Path::new(db_path);
    if !src_path.exists() {
        return Err(storage_err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("database not found: {db_path}"),
        )));
    }

    // Open source read-only to minimize impact on a running instance.
    let src = Connection::open_with_flags(
        db_path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(storage_err)?;

    let mut dst = Connection::open(backup_path).map_err(storage_err)?;

    let backup = rusqlite::backup::Backup::new(&src, &mut dst).map_err(storage_err)?;

    // Copy 100 pages per step, sleep 10ms between steps, so a running
    // instance can keep writing.
    backup
        .run_to_completion(100, Duration::from_millis(10), None)
        .map_err(storage_err)?;

    let metadata = std::fs::metadata(backup_path).map_err(storage_err)?;
    let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
    eprintln!("Backup complete: {size_mb:.1} MB written to {backup_path}");

    Ok(())
}

/// Restore the trip database from a backup file.
///
/// Creates a safety backup of the current database before overwriting.
pub fn run_restore(db_path: &str, restore_from: &str) -> Result<(), VoyagioError> {
    let src_path = Path::new(restore_from);
    if !src_path.exists() {
        return Err(storage_err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("backup file not found: {restore_from}"),
        )));
    }

    // Validate the source is a readable SQLite database.
    let test_conn =
        Connection::open_with_flags(restore_from, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(storage_err)?;
    test_conn.execute_batch("SELECT 1").map_err(storage_err)?;
    drop(test_conn);

    let dst_path = Path::new(db_path);
    if dst_path.exists() {
        let pre_restore_path = format!("{db_path}.pre-restore");
        eprintln!("Creating safety backup: {pre_restore_path}");
        run_backup(db_path, &pre_restore_path)?;
    }

    let src =
        Connection::open_with_flags(restore_from, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(storage_err)?;

    let mut dst = Connection::open(db_path).map_err(storage_err)?;

    let backup = rusqlite::backup::Backup::new(&src, &mut dst).map_err(storage_err)?;

    backup
        .run_to_completion(100, Duration::from_millis(10), None)
        .map_err(storage_err)?;

    let metadata = std::fs::metadata(db_path).map_err(storage_err)?;
    let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
    eprintln!("Restore complete: {size_mb:.1} MB restored from {restore_from}");

    Ok(())
}
