//! risk-advisor HTTP Server
//!
//! Axum-based JSON API behind the paper-trading dashboard: questionnaire
//! scoring, candidate ranking, portfolio analysis and recommendations.

mod config;
mod error;
mod extract;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use risk_advisor::Advisor;
use risk_advisor::store::{CatalogStore, FileCatalogStore, MemoryProfileStore, SeedCatalogStore};

use crate::config::ServerConfig;
use crate::handlers::{
    analyze_portfolio, get_instrument, health_check, latest_profile, list_catalog, policy,
    profile_history, questionnaire, rank_candidates, recommend, score_profile,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();

    let advisor = Advisor::new(config.advisor.clone())?;

    let catalog: Arc<dyn CatalogStore> = match &config.catalog_path {
        Some(path) => Arc::new(FileCatalogStore::open(path).await?),
        None => {
            tracing::info!("CATALOG_PATH not set, serving the built-in catalog");
            Arc::new(SeedCatalogStore::new()?)
        }
    };
    let instruments = catalog.snapshot().await?.len();
    tracing::info!("✓ {} ready with {} instruments", catalog.name(), instruments);

    let state = AppState {
        advisor: Arc::new(advisor),
        catalog,
        profiles: Arc::new(MemoryProfileStore::new()),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("risk-advisor server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                        - Health check");
    tracing::info!("  GET  /api/policy                    - Allocation policy table");
    tracing::info!("  GET  /api/questionnaire             - Questionnaire factors");
    tracing::info!("  GET  /api/catalog                   - Instrument catalog");
    tracing::info!("  POST /api/profile/score             - Score a questionnaire");
    tracing::info!("  POST /api/recommendations/rank      - Ranked candidates");
    tracing::info!("  POST /api/portfolio/analyze         - Portfolio risk report");
    tracing::info!("  POST /api/recommendations           - Full recommendations");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & reference data
        .route("/health", get(health_check))
        .route("/api/policy", get(policy))
        .route("/api/questionnaire", get(questionnaire))
        .route("/api/catalog", get(list_catalog))
        .route("/api/catalog/{symbol}", get(get_instrument))
        // Profiles
        .route("/api/profile/score", post(score_profile))
        .route("/api/profile/{user_id}", get(latest_profile))
        .route("/api/profile/{user_id}/history", get(profile_history))
        // Advice
        .route("/api/recommendations/rank", post(rank_candidates))
        .route("/api/recommendations", post(recommend))
        .route("/api/portfolio/analyze", post(analyze_portfolio))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
