use actix_web::{web, HttpResponse};
use rand::rngs::StdRng;
use rand::SeedableRng;
use validator::Validate;

use crate::auth::Caller;
use crate::error::MatchError;
use crate::models::{ErrorResponse, RecommendationQuery, RecommendationRequest, RecommendationsResponse, UserId};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/recommendations", web::get().to(get_recommendations))
        .route("/recommendations", web::post().to(post_recommendations));
}

/// Only an absent or rejected token becomes "no requester"; a token that
/// decodes but names a bad identifier keeps its own error, as on the match
/// endpoints.
fn requester(caller: Result<Caller, MatchError>) -> Result<Option<UserId>, MatchError> {
    match caller {
        Ok(caller) => Ok(Some(caller.id)),
        Err(MatchError::Unauthorized) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Shared path of both endpoints; a missing requester surfaces as
/// `Unauthorized` from the recommender itself.
async fn recommend(
    state: &AppState,
    caller: Result<Caller, MatchError>,
    seed: Option<Vec<String>>,
) -> Result<HttpResponse, MatchError> {
    let requester = requester(caller)?;
    let mut rng = StdRng::from_entropy();

    let candidates = state.recommender.recommend(requester, seed, &mut rng).await?;

    Ok(HttpResponse::Ok().json(RecommendationsResponse {
        total_results: candidates.len(),
        candidates,
    }))
}

/// GET /api/v1/recommendations?interests=hiking,music
async fn get_recommendations(
    state: web::Data<AppState>,
    caller: Result<Caller, MatchError>,
    query: web::Query<RecommendationQuery>,
) -> Result<HttpResponse, MatchError> {
    recommend(&state, caller, query.seed()).await
}

/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// { "interests": ["hiking", "music"] }
/// ```
async fn post_recommendations(
    state: web::Data<AppState>,
    caller: Result<Caller, MatchError>,
    req: web::Json<RecommendationRequest>,
) -> Result<HttpResponse, MatchError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommendations request: {:?}", errors);
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    recommend(&state, caller, req.into_inner().interests).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requester_mapping() {
        assert_eq!(requester(Ok(Caller { id: 4 })).unwrap(), Some(4));
        assert_eq!(requester(Err(MatchError::Unauthorized)).unwrap(), None);
        assert!(matches!(
            requester(Err(MatchError::InvalidIdentifier("alice".to_string()))),
            Err(MatchError::InvalidIdentifier(_))
        ));
    }
}
