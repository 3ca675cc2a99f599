//! Database reset and default seeding.
//!
//! `reset_database` wipes the query log and statistics and reseeds the
//! monitored domain list with `DEFAULT_DOMAINS`, in one transaction.
//! `seed_default_domains` only adds the defaults and never touches history.

use log::info;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::config::DEFAULT_DOMAINS;
use crate::error_handling::DatabaseError;

async fn insert_default_domains(tx: &mut Transaction<'_, Sqlite>) -> Result<usize, DatabaseError> {
    let mut inserted = 0;
    for (index, domain) in DEFAULT_DOMAINS.iter().enumerate() {
        let result = sqlx::query(
            "INSERT INTO domains (rank, domain) VALUES (?, ?)
             ON CONFLICT(domain) DO NOTHING",
        )
        .bind(index as i64 + 1)
        .bind(domain)
        .execute(&mut **tx)
        .await?;
        inserted += result.rows_affected() as usize;
    }
    Ok(inserted)
}

/// Clears all tables and seeds the default domains. Returns the number seeded.
pub async fn reset_database(pool: &SqlitePool) -> Result<usize, DatabaseError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM domain_stats").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM dns_queries").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM domains").execute(&mut *tx).await?;
    let seeded = insert_default_domains(&mut tx).await?;

    tx.commit().await?;
    info!("Database reinitialized with {seeded} default domains");
    Ok(seeded)
}

/// Adds the default domains to the monitored list, keeping recorded queries
/// and statistics. Domains already present are left as is. Returns the
/// number added.
pub async fn seed_default_domains(pool: &SqlitePool) -> Result<usize, DatabaseError> {
    let mut tx = pool.begin().await?;
    let seeded = insert_default_domains(&mut tx).await?;
    tx.commit().await?;
    info!("Seeded {seeded} default domains");
    Ok(seeded)
}
