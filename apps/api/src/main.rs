mod config;
mod db;
mod errors;
mod models;
mod recommendation;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::recommendation::fields::{FieldWeights, DEFAULT_WEIGHT_TABLE};
use crate::recommendation::ranker::HybridRanker;
use crate::recommendation::service::RecommendationService;
use crate::recommendation::store::{PgCandidateRetriever, PgJobStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recommender API v{}", env!("CARGO_PKG_VERSION"));

    // Validate the reranking weight table once; it is immutable from here on
    let weights = Arc::new(FieldWeights::new(&DEFAULT_WEIGHT_TABLE)?);
    info!("Rerank weight table validated (sum = {:.6})", weights.sum());
    for fw in weights.iter() {
        info!("Rerank weight {} = {:.2}", fw.field.as_str(), fw.weight);
    }
    info!(
        "Retrieval: num_candidates={} pool_limit={} top_k={} timeout={}ms",
        config.recommendation.num_candidates,
        config.recommendation.pool_limit,
        config.recommendation.top_k,
        config.recommendation.retrieval_timeout.as_millis()
    );

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    let recommendations = RecommendationService::new(
        Arc::new(PgJobStore::new(db.clone())),
        Arc::new(PgCandidateRetriever::new(db)),
        HybridRanker::new(weights),
        config.recommendation.clone(),
    );

    // Build app state
    let state = AppState { recommendations };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the dashboard host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
