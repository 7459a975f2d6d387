use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};
use std::time::Duration;

use crate::core::{CanonicalPair, DateRange};
use crate::models::{CandidateFilter, Match, MatchStatus, User, UserId};
use crate::services::store::{Activation, MatchStore, StoreError, UserDirectory};

const USER_COLUMNS: &str = "id, display_name, gender, intent, interests, date_of_birth, \
                            description, pictures, match_count, created_at";

const MATCH_COLUMNS: &str = "low_id, high_id, requested_by, status, matched_at, created_at";

/// PostgreSQL adapter for both the user directory and match records
///
/// Users and matches share one database so that activation and the two
/// counter increments commit in a single transaction.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool; migrations are the caller's concern
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn increment_in(conn: &mut PgConnection, id: UserId) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET match_count = match_count + 1 WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }
}

/// Map a unique-constraint failure onto [`StoreError::UniqueViolation`]
fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::UniqueViolation(db.message().to_string())
        }
        _ => StoreError::SqlxError(err),
    }
}

#[async_trait]
impl UserDirectory for PostgresStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_many(&self, filter: &CandidateFilter) -> Result<Vec<User>, StoreError> {
        // Random order before LIMIT so every eligible user can land in the pool
        let query = format!(
            r#"
            SELECT {}
            FROM users
            WHERE id <> $1
              AND intent = $2
              AND ($3::gender IS NULL OR gender = $3)
            ORDER BY random()
            LIMIT $4
            "#,
            USER_COLUMNS
        );

        let users = sqlx::query_as::<_, User>(&query)
            .bind(filter.exclude_id)
            .bind(filter.intent)
            .bind(filter.gender)
            .bind(filter.limit as i64)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            "Queried {} candidates for user {} (limit {})",
            users.len(),
            filter.exclude_id,
            filter.limit
        );

        Ok(users)
    }

    async fn increment_match_count(&self, id: UserId) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        Self::increment_in(&mut *conn, id).await
    }
}

#[async_trait]
impl MatchStore for PostgresStore {
    async fn find_pair(&self, pair: CanonicalPair) -> Result<Option<Match>, StoreError> {
        let query = format!(
            "SELECT {} FROM matches WHERE low_id = $1 AND high_id = $2",
            MATCH_COLUMNS
        );

        let record = sqlx::query_as::<_, Match>(&query)
            .bind(pair.low())
            .bind(pair.high())
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn insert_pending(
        &self,
        pair: CanonicalPair,
        requested_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Match, StoreError> {
        let query = format!(
            r#"
            INSERT INTO matches (low_id, high_id, requested_by, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );

        let record = sqlx::query_as::<_, Match>(&query)
            .bind(pair.low())
            .bind(pair.high())
            .bind(requested_by)
            .bind(MatchStatus::Pending)
            .bind(created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

        Ok(record)
    }

    async fn activate(
        &self,
        pair: CanonicalPair,
        matched_at: DateTime<Utc>,
    ) -> Result<Option<Activation>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Compare-and-swap on status: a concurrent accept blocks on the row
        // lock and then sees the row as active, updating nothing.
        let update = format!(
            r#"
            UPDATE matches
            SET status = $3, matched_at = $4
            WHERE low_id = $1 AND high_id = $2 AND status = $5
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );

        let activated = sqlx::query_as::<_, Match>(&update)
            .bind(pair.low())
            .bind(pair.high())
            .bind(MatchStatus::Active)
            .bind(matched_at)
            .bind(MatchStatus::Pending)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(record) = activated {
            Self::increment_in(&mut *tx, pair.low()).await?;
            Self::increment_in(&mut *tx, pair.high()).await?;
            tx.commit().await?;

            tracing::debug!("Activated match {}-{} in PostgreSQL", pair.low(), pair.high());
            return Ok(Some(Activation::Activated(record)));
        }

        let select = format!(
            "SELECT {} FROM matches WHERE low_id = $1 AND high_id = $2",
            MATCH_COLUMNS
        );
        let current = sqlx::query_as::<_, Match>(&select)
            .bind(pair.low())
            .bind(pair.high())
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(current.map(Activation::Unchanged))
    }

    async fn pending_received_by(&self, user_id: UserId) -> Result<Vec<Match>, StoreError> {
        let query = format!(
            r#"
            SELECT {}
            FROM matches
            WHERE status = $2
              AND (low_id = $1 OR high_id = $1)
              AND requested_by <> $1
            ORDER BY created_at DESC
            "#,
            MATCH_COLUMNS
        );

        let records = sqlx::query_as::<_, Match>(&query)
            .bind(user_id)
            .bind(MatchStatus::Pending)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn active_for(
        &self,
        user_id: UserId,
        range: Option<DateRange>,
    ) -> Result<Vec<Match>, StoreError> {
        let query = format!(
            r#"
            SELECT {}
            FROM matches
            WHERE status = $2
              AND (low_id = $1 OR high_id = $1)
              AND ($3::timestamptz IS NULL OR matched_at >= $3)
              AND ($4::timestamptz IS NULL OR matched_at <= $4)
            ORDER BY matched_at DESC
            "#,
            MATCH_COLUMNS
        );

        let records = sqlx::query_as::<_, Match>(&query)
            .bind(user_id)
            .bind(MatchStatus::Active)
            .bind(range.and_then(|r| r.start))
            .bind(range.and_then(|r| r.end))
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
