use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use alignment_api::alignment::coverage::KeywordCoverageScorer;
use alignment_api::alignment::loader::{load_profile, load_vocabulary};
use alignment_api::config::Config;
use alignment_api::routes::build_router;
use alignment_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Alignment API v{}", env!("CARGO_PKG_VERSION"));

    // Vocabulary: custom file or built-in default
    let vocabulary = load_vocabulary(config.vocabulary_path.as_deref()).await?;

    // Optional default profile
    let profile = match &config.profile_path {
        Some(path) => Some(Arc::new(load_profile(path).await?)),
        None => {
            info!("No PROFILE_PATH set; /api/v1/align requires a profile in the request");
            None
        }
    };

    info!(
        "Alignment policy: {} phrases per bullet, each signal reused at most {} time(s)",
        config.policy.max_phrases_per_bullet, config.policy.signal_reuse_limit
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        vocabulary: Arc::new(vocabulary),
        profile,
        coverage_scorer: Arc::new(KeywordCoverageScorer),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
