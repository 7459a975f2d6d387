use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::{ErrorResponse, UserId};
use crate::services::StoreError;

/// Errors surfaced by match and recommendation operations
///
/// Every variant except [`MatchError::Unavailable`] describes a caller or
/// data problem and is returned as-is; nothing here is retried.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid user identifier: {0}")]
    InvalidIdentifier(String),

    #[error("A user cannot be paired with themselves")]
    SelfReference,

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Users cannot be paired: {0}")]
    IneligiblePair(String),

    #[error("No match exists between users {0} and {1}")]
    MatchNotFound(UserId, UserId),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Missing or invalid caller identity")]
    Unauthorized,

    #[error("Store unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

impl MatchError {
    /// Short machine-readable code used in the `error` field of responses
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::InvalidIdentifier(_) => "invalid_identifier",
            MatchError::SelfReference => "self_reference",
            MatchError::UserNotFound(_) => "user_not_found",
            MatchError::IneligiblePair(_) => "ineligible_pair",
            MatchError::MatchNotFound(_, _) => "match_not_found",
            MatchError::InvalidRange(_) => "invalid_range",
            MatchError::Unauthorized => "unauthorized",
            MatchError::Unavailable(_) => "service_unavailable",
        }
    }
}

impl ResponseError for MatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            MatchError::InvalidIdentifier(_)
            | MatchError::SelfReference
            | MatchError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            MatchError::Unauthorized => StatusCode::UNAUTHORIZED,
            MatchError::IneligiblePair(_) => StatusCode::FORBIDDEN,
            MatchError::UserNotFound(_) | MatchError::MatchNotFound(_, _) => StatusCode::NOT_FOUND,
            MatchError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Store internals stay in the logs
        let message = match self {
            MatchError::Unavailable(e) => {
                tracing::error!("Store failure: {}", e);
                "The service is temporarily unavailable".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message,
            status_code: status.as_u16(),
        })
    }
}
