use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use poroshki::{api, config::ServerConfig, state::AppState, storage::FileStorage, verses};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poroshki=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Poroshki...");

    let config = ServerConfig::from_env();

    // One-shot verse load. On failure the server still comes up with an
    // empty store and the API reports the error state; a restart retries.
    let verse_store = match verses::load_verses(&config.verse_source).await {
        Ok(verse_store) => verse_store,
        Err(e) => {
            tracing::error!("Failed to load verses: {}", e);
            Vec::new()
        }
    };

    let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
    let state = Arc::new(AppState::new(verse_store, config.game.clone(), storage));

    let app = Router::new()
        .route("/api/state", get(api::get_state))
        .route("/api/round", post(api::start_round))
        .route("/api/round/resume", post(api::resume_round))
        .route("/api/answer", post(api::submit_answer))
        .route("/api/home", post(api::go_home))
        .route("/api/progress/reset", post(api::reset_progress))
        .route("/api/share", get(api::share_round))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
