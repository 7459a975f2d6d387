use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound on seed interests accepted in one recommendation request
pub const MAX_SEED_INTERESTS: usize = 50;

/// Body of `POST /recommendations`
///
/// ```json
/// { "interests": ["hiking", "music"] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(length(max = 50))]
    #[serde(default)]
    pub interests: Option<Vec<String>>,
}

/// Query string of `GET /recommendations?interests=hiking,music`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub interests: Option<String>,
}

impl RecommendationQuery {
    /// Split the comma separated list; an empty parameter counts as absent
    pub fn seed(&self) -> Option<Vec<String>> {
        let raw = self.interests.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        Some(raw.split(',').map(str::to_string).collect())
    }
}

/// Query string of `GET /matches/active`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveRangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}
