//! Lume Match - match lifecycle and recommendation service for Lume dating app
//!
//! This library provides the pairing core used by the Lume dating app:
//! canonical user pairs, the pending → active match state machine, and a
//! shared-interest recommendation ranker.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{canonicalize, CanonicalPair, MatchLifecycle, Ranker, RankerLimits, Recommender, RequestOutcome};
pub use crate::error::MatchError;
pub use crate::models::{Gender, Intent, Match, MatchStatus, RecommendationCandidate, User, UserId};
pub use crate::services::{MatchStore, MemoryStore, PostgresStore, StoreError, UserDirectory};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let pair = canonicalize(8, 3).unwrap();
        assert_eq!((pair.low(), pair.high()), (3, 8));
    }
}
