//! Bulk-load business records from the JSON seed file.

use serde::Deserialize;
use sqlx::PgPool;

use crate::DbError;

/// One entry of the `businesses.json` seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessSeed {
    pub name: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl BusinessSeed {
    /// Seed rows with a blank name, city, or state are silently skipped
    /// rather than failing the whole batch.
    fn is_usable(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.city.trim().is_empty()
            && !self.state.trim().is_empty()
    }
}

/// Insert seed records into the database inside a single transaction.
///
/// Returns the number of rows inserted; unusable rows are skipped. If any
/// insert fails the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_businesses(pool: &PgPool, records: &[BusinessSeed]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for record in records {
        if !record.is_usable() {
            continue;
        }

        sqlx::query(
            "INSERT INTO businesses (name, city, state, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(record.name.trim())
        .bind(record.city.trim())
        .bind(record.state.trim())
        .bind(record.latitude)
        .bind(record.longitude)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
