//! Matchup Normalizer odds service
//!
//! Serves grouped per-matchup odds from per-sport Parquet files over HTTP.

use anyhow::{Context, Result};
use matchup_normalizer::api::{router, AppState, HealthState};
use matchup_normalizer::config::Config;
use matchup_normalizer::ingest::{OddsIngestionService, ParquetOddsStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("matchup_normalizer=info".parse()?),
        )
        .init();

    info!("Matchup Normalizer v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!("Odds data directory: {}", config.data_dir.display());

    let store = ParquetOddsStore::new(config.data_dir.clone());
    let service = OddsIngestionService::new(
        Arc::new(store),
        Duration::from_secs(config.read_timeout_seconds),
    );

    let app = router(AppState {
        service: Arc::new(service),
        health: HealthState::new(),
        default_sport: config.default_sport.clone(),
        default_window_hours: config.default_window_hours,
    });

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down...");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}
