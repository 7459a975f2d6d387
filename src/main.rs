use actix_cors::Cors;
use actix_web::{error, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lume_match::auth::JwtVerifier;
use lume_match::config::Settings;
use lume_match::core::Ranker;
use lume_match::models::ErrorResponse;
use lume_match::routes::{self, AppState};
use lume_match::services::PostgresStore;

fn json_error(error: &str, message: String) -> actix_web::Error {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    };
    error::InternalError::from_response(body.message.clone(), HttpResponse::BadRequest().json(body)).into()
}

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    json_error("invalid_json", format!("Invalid JSON: {}", err))
}

/// Handle query payload errors
fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    json_error("invalid_query", format!("Invalid query: {}", err))
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_tracing(&settings.logging.level, &settings.logging.format);

    info!("Starting Lume Match service...");

    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let store = PostgresStore::from_settings(
        &settings.database.url,
        Some(db_max_conn),
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
    })?;
    let store = Arc::new(store);

    info!("PostgreSQL store initialized (max: {} connections)", db_max_conn);

    let limits = settings.recommendations.limits();
    let ranker = Ranker::new(limits);

    info!("Ranker initialized with limits: {:?}", limits);

    let verifier = JwtVerifier::new(&settings.auth.jwt_secret, settings.auth.issuer.as_deref());

    let app_state = AppState::new(store.clone(), store, ranker, verifier);

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
