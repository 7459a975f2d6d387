// Route exports
pub mod matches;
pub mod recommendations;

use actix_web::web;
use std::sync::Arc;

use crate::auth::JwtVerifier;
use crate::core::{MatchLifecycle, Ranker, Recommender};
use crate::services::{MatchStore, UserDirectory};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
    pub store: Arc<dyn MatchStore>,
    pub lifecycle: MatchLifecycle,
    pub recommender: Recommender,
    pub verifier: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        store: Arc<dyn MatchStore>,
        ranker: Ranker,
        verifier: JwtVerifier,
    ) -> Self {
        Self {
            lifecycle: MatchLifecycle::new(directory.clone(), store.clone()),
            recommender: Recommender::new(directory.clone(), ranker),
            directory,
            store,
            verifier: Arc::new(verifier),
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(recommendations::configure),
    );
}
