use chrono::Utc;
use std::sync::Arc;

use crate::core::eligibility::check_eligibility;
use crate::core::pair::{canonicalize, CanonicalPair};
use crate::core::range::DateRange;
use crate::error::MatchError;
use crate::models::{Match, MatchStatus, User, UserId};
use crate::services::{Activation, MatchStore, StoreError, UserDirectory};

/// Result of a connection request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub record: Match,
    /// False when the pair already had a pending or active match
    pub created: bool,
}

/// Match state machine: `pending -> active`, idempotent in both directions
///
/// Every operation canonicalizes the pair before touching the store and
/// takes the caller's id as an explicit argument.
#[derive(Clone)]
pub struct MatchLifecycle {
    directory: Arc<dyn UserDirectory>,
    store: Arc<dyn MatchStore>,
}

impl MatchLifecycle {
    pub fn new(directory: Arc<dyn UserDirectory>, store: Arc<dyn MatchStore>) -> Self {
        Self { directory, store }
    }

    async fn load_user(&self, id: UserId) -> Result<User, MatchError> {
        self.directory
            .find_by_id(id)
            .await?
            .ok_or(MatchError::UserNotFound(id))
    }

    /// Canonicalize, resolve both users and apply the pairing rules
    async fn eligible_pair(&self, a: UserId, b: UserId) -> Result<CanonicalPair, MatchError> {
        let pair = canonicalize(a, b)?;
        let first = self.load_user(a).await?;
        let second = self.load_user(b).await?;
        check_eligibility(&first, &second)?;
        Ok(pair)
    }

    /// Ask to connect `requester_id` with `target_id`
    ///
    /// Creates a pending match on first request. Repeat requests from either
    /// side return the existing record unchanged.
    pub async fn request_match(
        &self,
        requester_id: UserId,
        target_id: UserId,
    ) -> Result<RequestOutcome, MatchError> {
        let pair = self.eligible_pair(requester_id, target_id).await?;

        if let Some(existing) = self.store.find_pair(pair).await? {
            tracing::debug!(
                "Match {}-{} already {:?}, request from {} is a no-op",
                pair.low(),
                pair.high(),
                existing.status,
                requester_id
            );
            return Ok(RequestOutcome { record: existing, created: false });
        }

        match self.store.insert_pending(pair, requester_id, Utc::now()).await {
            Ok(record) => {
                tracing::info!(
                    "Match requested: {} -> {} (pair {}-{})",
                    requester_id,
                    target_id,
                    pair.low(),
                    pair.high()
                );
                Ok(RequestOutcome { record, created: true })
            }
            Err(StoreError::UniqueViolation(detail)) => {
                // Lost the insert race; the winner's record is the answer
                tracing::warn!(
                    "Concurrent request for pair {}-{} ({}), re-reading",
                    pair.low(),
                    pair.high(),
                    detail
                );
                let record = self.store.find_pair(pair).await?.ok_or_else(|| {
                    StoreError::NotFound(format!("match {}-{} after conflict", pair.low(), pair.high()))
                })?;
                Ok(RequestOutcome { record, created: false })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Accept the match between `accepter_id` and `target_id`
    ///
    /// Eligibility is checked again since user attributes may have changed
    /// after the request. Counters move only on the call that activates.
    pub async fn accept_match(
        &self,
        accepter_id: UserId,
        target_id: UserId,
    ) -> Result<Match, MatchError> {
        let pair = self.eligible_pair(accepter_id, target_id).await?;
        let not_found = || MatchError::MatchNotFound(pair.low(), pair.high());

        match self.store.activate(pair, Utc::now()).await? {
            None => Err(not_found()),
            Some(Activation::Activated(record)) => {
                tracing::info!(
                    "Match activated: {}-{} (accepted by {})",
                    pair.low(),
                    pair.high(),
                    accepter_id
                );
                Ok(record)
            }
            Some(Activation::Unchanged(record)) if record.status == MatchStatus::Active => {
                tracing::debug!("Match {}-{} already active", pair.low(), pair.high());
                Ok(record)
            }
            Some(Activation::Unchanged(_)) => Err(not_found()),
        }
    }

    /// Pending requests waiting on `user_id`, newest first
    pub async fn pending_received_by(&self, user_id: UserId) -> Result<Vec<Match>, MatchError> {
        Ok(self.store.pending_received_by(user_id).await?)
    }

    /// Active matches of `user_id` matched within `range` (all when `None`), newest first
    pub async fn active_between(
        &self,
        user_id: UserId,
        range: Option<DateRange>,
    ) -> Result<Vec<Match>, MatchError> {
        Ok(self.store.active_for(user_id, range).await?)
    }
}
