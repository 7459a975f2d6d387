use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::models::{CandidateFilter, Gender, RecommendationCandidate, User};

/// Candidates fetched from the directory per ranking call
pub const DEFAULT_POOL_SIZE: usize = 100;

/// Hard ceiling on candidates returned per ranking call
pub const MAX_RESULTS: usize = 20;

/// Candidates returned per ranking call
pub const DEFAULT_MAX_RESULTS: usize = MAX_RESULTS;

/// Pool and result bounds for a [`Ranker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankerLimits {
    pub pool_size: usize,
    pub max_results: usize,
}

impl Default for RankerLimits {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Shared-interest ranker
///
/// # Pipeline
/// 1. Directory filter: same intent, opposite gender when known, not self
/// 2. Shuffle the pool so insertion order never biases results
/// 3. Score by shared interest count and sort descending (seeded requests only)
/// 4. Truncate to `max_results`
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    limits: RankerLimits,
}

impl Ranker {
    /// Build a ranker; `max_results` is capped at [`MAX_RESULTS`] and the
    /// pool holds at least one candidate
    pub fn new(limits: RankerLimits) -> Self {
        let bounded = RankerLimits {
            pool_size: limits.pool_size.max(1),
            max_results: limits.max_results.min(MAX_RESULTS),
        };

        if bounded != limits {
            tracing::warn!("Ranker limits {:?} adjusted to {:?}", limits, bounded);
        }

        Self { limits: bounded }
    }

    pub fn limits(&self) -> RankerLimits {
        self.limits
    }

    /// Build the directory query for `requester`
    ///
    /// `male` looks for `female` and vice versa. Requesters with gender
    /// `other` or unset get no gender filter, only the intent filter.
    pub fn candidate_filter(&self, requester: &User) -> CandidateFilter {
        CandidateFilter {
            exclude_id: requester.id,
            intent: requester.intent,
            gender: requester.gender.and_then(Gender::opposite),
            limit: self.limits.pool_size,
        }
    }

    /// Rank a candidate pool against `seed` interests
    ///
    /// With an empty seed the shuffled pool is returned as-is with score 0.
    pub fn rank<R: Rng + ?Sized>(
        &self,
        seed: &[String],
        mut pool: Vec<User>,
        rng: &mut R,
    ) -> Vec<RecommendationCandidate> {
        pool.shuffle(rng);
        pool.truncate(self.limits.pool_size);

        let seed: HashSet<&str> = seed.iter().map(String::as_str).collect();

        let mut ranked: Vec<RecommendationCandidate> = if seed.is_empty() {
            pool.into_iter()
                .take(self.limits.max_results)
                .map(|user| RecommendationCandidate::from_user(user, 0))
                .collect()
        } else {
            pool.into_iter()
                .map(|user| {
                    let score = shared_interest_count(&seed, &user.interests);
                    RecommendationCandidate::from_user(user, score)
                })
                .collect()
        };

        // Stable sort keeps the shuffled order among equal scores
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(self.limits.max_results);
        ranked
    }
}

/// Number of distinct interest tags a candidate shares with the seed set
#[inline]
pub fn shared_interest_count(seed: &HashSet<&str>, interests: &[String]) -> usize {
    interests
        .iter()
        .map(String::as_str)
        .filter(|tag| seed.contains(tag))
        .collect::<HashSet<_>>()
        .len()
}

/// Trim tags, drop empty ones and remove duplicates, keeping first-seen order
pub fn normalize_seed(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_string()))
        .map(str::to_string)
        .collect()
}
