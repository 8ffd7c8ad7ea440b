//! Read/write queries for the `businesses` table, plus the [`PgBusinessStore`]
//! adapter that exposes it through the core search trait.

use sqlx::PgPool;

use bizsearch_core::{Business, BusinessStore, StoreFilter};

use crate::DbError;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct BusinessRow {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<BusinessRow> for Business {
    fn from(row: BusinessRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            city: row.city,
            state: row.state,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

/// Insert payload for one business record.
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub name: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Query businesses, optionally narrowed by name substring and/or state codes.
///
/// `name_contains` matches case-insensitively anywhere in the name; an empty
/// `states` slice means no state restriction. Both narrow with AND. Rows come
/// back name-ascending, which is the store's stable default order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn search_businesses(
    pool: &PgPool,
    name_contains: Option<&str>,
    states: &[String],
) -> Result<Vec<BusinessRow>, sqlx::Error> {
    let pattern = name_contains.map(like_pattern);
    sqlx::query_as::<_, BusinessRow>(
        "SELECT id, name, city, state, latitude, longitude \
         FROM businesses \
         WHERE ($1::text IS NULL OR name ILIKE $1) \
           AND (cardinality($2::text[]) = 0 OR state = ANY($2)) \
         ORDER BY name ASC",
    )
    .bind(pattern)
    .bind(states)
    .fetch_all(pool)
    .await
}

/// List every business, name-ascending. Used by the export command.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_all_businesses(pool: &PgPool) -> Result<Vec<BusinessRow>, sqlx::Error> {
    sqlx::query_as::<_, BusinessRow>(
        "SELECT id, name, city, state, latitude, longitude \
         FROM businesses \
         ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await
}

/// Insert one business and return its generated id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the insert fails.
pub async fn insert_business(pool: &PgPool, business: &NewBusiness) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO businesses (name, city, state, latitude, longitude) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&business.name)
    .bind(&business.city)
    .bind(&business.state)
    .bind(business.latitude)
    .bind(business.longitude)
    .fetch_one(pool)
    .await
}

/// Count all business records.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_businesses(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM businesses")
        .fetch_one(pool)
        .await
}

/// Escape LIKE metacharacters and wrap in `%...%` for containment matching.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Postgres-backed record store consumed by the search orchestrator.
#[derive(Debug, Clone)]
pub struct PgBusinessStore {
    pool: PgPool,
}

impl PgBusinessStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BusinessStore for PgBusinessStore {
    type Error = DbError;

    async fn query(&self, filter: &StoreFilter) -> Result<Vec<Business>, DbError> {
        let rows =
            search_businesses(&self.pool, filter.name_contains.as_deref(), &filter.states).await?;
        Ok(rows.into_iter().map(Business::from).collect())
    }
}
