// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CandidateFilter, Gender, Intent, Match, MatchStatus, RecommendationCandidate, User, UserId};
pub use requests::{ActiveRangeQuery, RecommendationQuery, RecommendationRequest, MAX_SEED_INTERESTS};
pub use responses::{ErrorResponse, HealthResponse, MatchResource, ParticipantSummary, RecommendationsResponse};
