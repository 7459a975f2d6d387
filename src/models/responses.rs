use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Gender, Intent, Match, MatchStatus, RecommendationCandidate, User, UserId};

/// Participant shown alongside a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub id: UserId,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub gender: Option<Gender>,
    pub intent: Intent,
    pub pictures: Vec<String>,
}

impl From<&User> for ParticipantSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            gender: user.gender,
            intent: user.intent,
            pictures: user.pictures.clone(),
        }
    }
}

/// Match resource returned by every match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResource {
    #[serde(rename = "lowId")]
    pub low_id: UserId,
    #[serde(rename = "highId")]
    pub high_id: UserId,
    #[serde(rename = "requestedBy")]
    pub requested_by: UserId,
    pub status: MatchStatus,
    #[serde(rename = "matchedAt")]
    pub matched_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Summaries of both users; a participant missing from the directory is omitted
    pub participants: Vec<ParticipantSummary>,
}

impl MatchResource {
    pub fn new(record: Match, participants: Vec<ParticipantSummary>) -> Self {
        Self {
            low_id: record.low_id,
            high_id: record.high_id,
            requested_by: record.requested_by,
            status: record.status,
            matched_at: record.matched_at,
            created_at: record.created_at,
            participants,
        }
    }
}

/// Response for the recommendations endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub candidates: Vec<RecommendationCandidate>,
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
