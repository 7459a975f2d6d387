use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::{CanonicalPair, DateRange};
use crate::models::{CandidateFilter, Match, User, UserId};

/// Errors raised by store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Outcome of an activation attempt on an existing match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// This call moved the match from pending to active and bumped both counters
    Activated(Match),
    /// The match was not pending; returned untouched
    Unchanged(Match),
}

impl Activation {
    pub fn into_match(self) -> Match {
        match self {
            Activation::Activated(m) | Activation::Unchanged(m) => m,
        }
    }
}

/// Read access to users plus the atomic match counter
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Random sample of at most `filter.limit` users satisfying `filter`
    ///
    /// The sample is drawn over every matching user, so storage order never
    /// decides who can be recommended.
    async fn find_many(&self, filter: &CandidateFilter) -> Result<Vec<User>, StoreError>;

    /// Atomically add one to the user's match counter
    ///
    /// Part of the directory contract for callers outside the match core.
    /// Activation does not go through it: [`MatchStore::activate`] bumps both
    /// counters inside its own atomic step, since two separate calls here
    /// could not commit together with the status change.
    async fn increment_match_count(&self, id: UserId) -> Result<(), StoreError>;
}

/// Persistence for match records
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn find_pair(&self, pair: CanonicalPair) -> Result<Option<Match>, StoreError>;

    /// Insert a pending match for `pair`
    ///
    /// Fails with [`StoreError::UniqueViolation`] when a record for the pair
    /// already exists.
    async fn insert_pending(
        &self,
        pair: CanonicalPair,
        requested_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Match, StoreError>;

    /// Move a pending match to active and increment both participants'
    /// counters as one atomic step. Returns `None` when no record exists.
    async fn activate(
        &self,
        pair: CanonicalPair,
        matched_at: DateTime<Utc>,
    ) -> Result<Option<Activation>, StoreError>;

    /// Pending matches naming `user_id` as the receiver, newest first
    async fn pending_received_by(&self, user_id: UserId) -> Result<Vec<Match>, StoreError>;

    /// Active matches of `user_id` within `range`, most recently matched first
    async fn active_for(
        &self,
        user_id: UserId,
        range: Option<DateRange>,
    ) -> Result<Vec<Match>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
