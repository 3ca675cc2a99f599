//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled so readers never block the query log writer
//! - Automatic database file creation

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use log::{error, info};
use sqlx::{Pool, Sqlite, SqlitePool};

use crate::error_handling::DatabaseError;

/// Initializes and returns a database connection pool for `db_path`.
///
/// Creates the database file if it doesn't exist and enables WAL mode.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<Arc<Pool<Sqlite>>, DatabaseError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file {db_path_str} created."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Using existing database file {db_path_str}.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path_str))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            DatabaseError::SqlError(e)
        })?;

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            DatabaseError::SqlError(e)
        })?;

    Ok(Arc::new(pool))
}
