pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // User routes
        .route("/api/users/me", get(routes::users::me))
        .route("/api/home", get(routes::home::summary))
        // Deck routes
        .route("/api/decks", get(routes::decks::list).post(routes::decks::create))
        .route("/api/decks/:id", get(routes::decks::get))
        .route("/api/decks/:id/review", get(routes::decks::review))
        .route("/api/decks/:id/cards", post(routes::decks::add_card))
        .route("/api/decks/:id/cards/:card_id", get(routes::decks::get_card))
        // Card routes
        .route(
            "/api/cards/:id",
            patch(routes::cards::update).delete(routes::cards::delete),
        )
        .route("/api/cards/:id/review", post(routes::cards::review))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let addr = config.bind_addr();
    let state = AppState {
        db: Arc::new(db),
        config: Arc::new(config),
    };

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

/// State over a pool that never connects, for handlers that fail before
/// reaching the database.
#[cfg(test)]
pub(crate) fn offline_state() -> AppState {
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/flashdeck_offline".to_string()),
        _ => None,
    })
    .unwrap();
    let db = Database::connect_lazy(&config.database_url).unwrap();
    AppState {
        db: Arc::new(db),
        config: Arc::new(config),
    }
}
