use actix_web::{web, HttpResponse};
use std::collections::HashMap;

use crate::auth::Caller;
use crate::core::{parse_user_id, DateRange};
use crate::error::MatchError;
use crate::models::{ActiveRangeQuery, HealthResponse, Match, MatchResource, ParticipantSummary, User, UserId};
use crate::routes::AppState;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/pending", web::get().to(list_pending))
        .route("/matches/active", web::get().to(list_active))
        .route("/matches/{target_id}", web::post().to(request_match))
        .route("/matches/{target_id}/accept", web::post().to(accept_match));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Attach participant summaries, looking each user up once
async fn hydrate(state: &AppState, records: Vec<Match>) -> Result<Vec<MatchResource>, MatchError> {
    let mut users: HashMap<UserId, Option<User>> = HashMap::new();

    for record in &records {
        for id in [record.low_id, record.high_id] {
            if !users.contains_key(&id) {
                let user = state.directory.find_by_id(id).await?;
                users.insert(id, user);
            }
        }
    }

    Ok(records
        .into_iter()
        .map(|record| {
            let participants = [record.low_id, record.high_id]
                .iter()
                .filter_map(|id| users.get(id).and_then(Option::as_ref))
                .map(ParticipantSummary::from)
                .collect();
            MatchResource::new(record, participants)
        })
        .collect())
}

/// Request a match with another user
///
/// POST /api/v1/matches/{targetId}
///
/// 201 when the pending match was created, 200 when it already existed.
async fn request_match(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, MatchError> {
    let target_id = parse_user_id(Some(path.as_str()))?;

    let outcome = state.lifecycle.request_match(caller.id, target_id).await?;
    let created = outcome.created;

    let resource = hydrate(&state, vec![outcome.record])
        .await?
        .pop()
        .ok_or(MatchError::MatchNotFound(caller.id.min(target_id), caller.id.max(target_id)))?;

    if created {
        Ok(HttpResponse::Created().json(resource))
    } else {
        Ok(HttpResponse::Ok().json(resource))
    }
}

/// Accept a pending match
///
/// POST /api/v1/matches/{targetId}/accept
async fn accept_match(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, MatchError> {
    let target_id = parse_user_id(Some(path.as_str()))?;

    let record = state.lifecycle.accept_match(caller.id, target_id).await?;

    let resource = hydrate(&state, vec![record])
        .await?
        .pop()
        .ok_or(MatchError::MatchNotFound(caller.id.min(target_id), caller.id.max(target_id)))?;

    Ok(HttpResponse::Ok().json(resource))
}

/// Pending requests awaiting the caller's decision
///
/// GET /api/v1/matches/pending
async fn list_pending(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, MatchError> {
    let records = state.lifecycle.pending_received_by(caller.id).await?;

    tracing::debug!("User {} has {} pending requests", caller.id, records.len());

    Ok(HttpResponse::Ok().json(hydrate(&state, records).await?))
}

/// Active matches, optionally limited to a matchedAt window
///
/// GET /api/v1/matches/active?start=2024-01-01&end=2024-01-31
async fn list_active(
    state: web::Data<AppState>,
    caller: Caller,
    query: web::Query<ActiveRangeQuery>,
) -> Result<HttpResponse, MatchError> {
    let range = DateRange::parse(query.start.as_deref(), query.end.as_deref())?;

    let records = state.lifecycle.active_between(caller.id, range).await?;

    Ok(HttpResponse::Ok().json(hydrate(&state, records).await?))
}
