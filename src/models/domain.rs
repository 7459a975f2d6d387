use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric user identifier as stored by the user directory
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// The gender a user of this gender is paired with, if any
    pub fn opposite(self) -> Option<Gender> {
        match self {
            Gender::Male => Some(Gender::Female),
            Gender::Female => Some(Gender::Male),
            Gender::Other => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        };
        f.write_str(s)
    }
}

/// What a user is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "intent", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Dating,
    Marriage,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Dating => f.write_str("dating"),
            Intent::Marriage => f.write_str("marriage"),
        }
    }
}

/// User record owned by the user directory
///
/// The match core only reads gender, intent and interests, and bumps
/// `match_count` when a match activates. Everything else is passed through.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub intent: Intent,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(rename = "dateOfBirth", default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pictures: Vec<String>,
    #[serde(rename = "matchCount", default)]
    pub match_count: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Active,
    /// Reserved for cancel/unmatch flows; nothing transitions here yet.
    Unmatched,
}

/// Relationship between two distinct users, keyed by the canonical pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
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
}

impl Match {
    pub fn involves(&self, user_id: UserId) -> bool {
        self.low_id == user_id || self.high_id == user_id
    }

    /// The participant on the other side of `user_id`
    pub fn counterpart(&self, user_id: UserId) -> Option<UserId> {
        if self.low_id == user_id {
            Some(self.high_id)
        } else if self.high_id == user_id {
            Some(self.low_id)
        } else {
            None
        }
    }

    /// True when this is a pending request waiting on `user_id` to decide
    pub fn awaits(&self, user_id: UserId) -> bool {
        self.status == MatchStatus::Pending && self.involves(user_id) && self.requested_by != user_id
    }
}

/// Candidate user with its shared-interest score, built per ranking call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationCandidate {
    pub id: UserId,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub gender: Option<Gender>,
    pub intent: Intent,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: Option<NaiveDate>,
    pub description: Option<String>,
    pub interests: Vec<String>,
    pub pictures: Vec<String>,
    pub score: usize,
}

impl RecommendationCandidate {
    pub fn from_user(user: User, score: usize) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            gender: user.gender,
            intent: user.intent,
            date_of_birth: user.date_of_birth,
            description: user.description,
            interests: user.interests,
            pictures: user.pictures,
            score,
        }
    }
}

/// Directory query used to build a recommendation pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFilter {
    pub exclude_id: UserId,
    pub intent: Intent,
    pub gender: Option<Gender>,
    pub limit: usize,
}

impl CandidateFilter {
    pub fn accepts(&self, user: &User) -> bool {
        user.id != self.exclude_id
            && user.intent == self.intent
            && self.gender.map_or(true, |g| user.gender == Some(g))
    }
}
