use rand::Rng;
use std::sync::Arc;

use crate::core::ranker::{normalize_seed, Ranker};
use crate::error::MatchError;
use crate::models::{RecommendationCandidate, UserId};
use crate::services::UserDirectory;

/// Read-only recommendation flow: resolve requester, fetch pool, rank
#[derive(Clone)]
pub struct Recommender {
    directory: Arc<dyn UserDirectory>,
    ranker: Ranker,
}

impl Recommender {
    pub fn new(directory: Arc<dyn UserDirectory>, ranker: Ranker) -> Self {
        Self { directory, ranker }
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Recommend candidates for `requester`
    ///
    /// `seed` falls back to the requester's stored interests when `None`.
    /// An explicit empty list disables scoring.
    pub async fn recommend<R: Rng + Send>(
        &self,
        requester: Option<UserId>,
        seed: Option<Vec<String>>,
        rng: &mut R,
    ) -> Result<Vec<RecommendationCandidate>, MatchError> {
        let requester_id = requester.ok_or(MatchError::Unauthorized)?;

        let requester = self
            .directory
            .find_by_id(requester_id)
            .await?
            .ok_or(MatchError::UserNotFound(requester_id))?;

        let seed = normalize_seed(seed.as_deref().unwrap_or(requester.interests.as_slice()));

        let filter = self.ranker.candidate_filter(&requester);
        let pool = self.directory.find_many(&filter).await?;
        let pool_size = pool.len();

        let ranked = self.ranker.rank(&seed, pool, rng);

        tracing::info!(
            "Ranked {} of {} candidates for user {} ({} seed interests)",
            ranked.len(),
            pool_size,
            requester_id,
            seed.len()
        );

        Ok(ranked)
    }
}
