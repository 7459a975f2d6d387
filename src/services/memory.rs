use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::core::{CanonicalPair, DateRange};
use crate::models::{CandidateFilter, Match, MatchStatus, User, UserId};
use crate::services::store::{Activation, MatchStore, StoreError, UserDirectory};

#[derive(Debug)]
struct MemoryState {
    users: BTreeMap<UserId, User>,
    matches: BTreeMap<CanonicalPair, Match>,
    /// Sampling source for candidate pools
    rng: StdRng,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            matches: BTreeMap::new(),
            rng: StdRng::from_entropy(),
        }
    }
}

/// In-process store for tests and local runs without PostgreSQL
///
/// A single lock guards users and matches, which gives the same atomicity
/// as the PostgreSQL transaction: activation and both counter increments
/// happen under one critical section.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a list of users
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            state: Mutex::new(MemoryState {
                users,
                ..MemoryState::default()
            }),
        }
    }

    /// Make candidate sampling reproducible
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.state.get_mut().rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Insert or replace a user
    pub async fn upsert_user(&self, user: User) {
        self.state.lock().await.users.insert(user.id, user);
    }

    pub async fn match_count(&self) -> usize {
        self.state.lock().await.matches.len()
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_many(&self, filter: &CandidateFilter) -> Result<Vec<User>, StoreError> {
        let mut guard = self.state.lock().await;
        let MemoryState { users, rng, .. } = &mut *guard;

        // Uniform sample over every eligible user, not the first `limit` by id
        Ok(users
            .values()
            .filter(|u| filter.accepts(u))
            .cloned()
            .choose_multiple(rng, filter.limit))
    }

    async fn increment_match_count(&self, id: UserId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;
        user.match_count += 1;
        Ok(())
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn find_pair(&self, pair: CanonicalPair) -> Result<Option<Match>, StoreError> {
        Ok(self.state.lock().await.matches.get(&pair).cloned())
    }

    async fn insert_pending(
        &self,
        pair: CanonicalPair,
        requested_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Match, StoreError> {
        let mut state = self.state.lock().await;

        if state.matches.contains_key(&pair) {
            return Err(StoreError::UniqueViolation(format!(
                "match ({}, {}) already exists",
                pair.low(),
                pair.high()
            )));
        }

        let record = Match {
            low_id: pair.low(),
            high_id: pair.high(),
            requested_by,
            status: MatchStatus::Pending,
            matched_at: None,
            created_at,
        };
        state.matches.insert(pair, record.clone());
        Ok(record)
    }

    async fn activate(
        &self,
        pair: CanonicalPair,
        matched_at: DateTime<Utc>,
    ) -> Result<Option<Activation>, StoreError> {
        let mut state = self.state.lock().await;

        let current = match state.matches.get(&pair) {
            Some(m) => m.clone(),
            None => return Ok(None),
        };

        if current.status != MatchStatus::Pending {
            return Ok(Some(Activation::Unchanged(current)));
        }

        // Check both users before touching anything so a failure leaves no partial update
        for id in [pair.low(), pair.high()] {
            if !state.users.contains_key(&id) {
                return Err(StoreError::NotFound(format!("user {}", id)));
            }
        }
        for id in [pair.low(), pair.high()] {
            if let Some(user) = state.users.get_mut(&id) {
                user.match_count += 1;
            }
        }

        let activated = Match {
            status: MatchStatus::Active,
            matched_at: Some(matched_at),
            ..current
        };
        state.matches.insert(pair, activated.clone());

        Ok(Some(Activation::Activated(activated)))
    }

    async fn pending_received_by(&self, user_id: UserId) -> Result<Vec<Match>, StoreError> {
        let state = self.state.lock().await;
        let mut records: Vec<Match> = state
            .matches
            .values()
            .filter(|m| m.awaits(user_id))
            .cloned()
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn active_for(
        &self,
        user_id: UserId,
        range: Option<DateRange>,
    ) -> Result<Vec<Match>, StoreError> {
        let state = self.state.lock().await;
        let mut records: Vec<Match> = state
            .matches
            .values()
            .filter(|m| m.status == MatchStatus::Active && m.involves(user_id))
            .filter(|m| match (range, m.matched_at) {
                (None, _) => true,
                (Some(r), Some(at)) => r.contains(at),
                (Some(_), None) => false,
            })
            .cloned()
            .collect();

        records.sort_by(|a, b| b.matched_at.cmp(&a.matched_at));
        Ok(records)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
