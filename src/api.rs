//! HTTP surface: `GET /odds` and `GET /health`.

use crate::ingest::{OddsIngestionService, OddsRequest};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;

/// Load outcome counters reported by `/health`
#[derive(Clone)]
pub struct HealthState {
    pub last_load_time: Arc<RwLock<Option<DateTime<Utc>>>>,
    pub last_game_count: Arc<RwLock<usize>>,
    pub error_count: Arc<RwLock<usize>>,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            last_load_time: Arc::new(RwLock::new(None)),
            last_game_count: Arc::new(RwLock::new(0)),
            error_count: Arc::new(RwLock::new(0)),
        }
    }

    pub async fn record_success(&self, count: usize) {
        *self.last_load_time.write().await = Some(Utc::now());
        *self.last_game_count.write().await = count;
        *self.error_count.write().await = 0;
    }

    pub async fn record_error(&self) {
        *self.error_count.write().await += 1;
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OddsIngestionService>,
    pub health: HealthState,
    pub default_sport: String,
    pub default_window_hours: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct OddsQuery {
    pub sport: Option<String>,
    pub hours: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl From<OddsQuery> for OddsRequest {
    fn from(query: OddsQuery) -> Self {
        Self {
            sport: query.sport,
            hours: query.hours,
            start: query.start,
            end: query.end,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/odds", get(odds_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// 200 with `{games, meta}` whenever the read did not fail, including when
/// the sport has no file; 500 with an error message otherwise.
pub async fn odds_handler(
    State(state): State<AppState>,
    Query(query): Query<OddsQuery>,
) -> (StatusCode, Json<Value>) {
    let request = OddsRequest::from(query);
    let sport = request.sport(&state.default_sport);
    let window = request.window(state.default_window_hours, Utc::now());

    match state.service.load_odds(&sport, &window).await {
        Ok(load) => {
            state.health.record_success(load.games.len()).await;
            (
                StatusCode::OK,
                Json(json!({
                    "games": load.games,
                    "meta": load.meta,
                })),
            )
        }
        Err(failure) => {
            state.health.record_error().await;
            error!("Odds request for {} failed: {}", sport, failure.error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "games": [],
                    "meta": failure.meta,
                    "error": failure.error.to_string(),
                })),
            )
        }
    }
}

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let last_load = state.health.last_load_time.read().await;
    let last_count = state.health.last_game_count.read().await;
    let errors = state.health.error_count.read().await;

    let status = if *errors > 5 { "degraded" } else { "ok" };

    let http_status = if *errors > 10 {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        http_status,
        Json(json!({
            "service": "matchup-normalizer",
            "version": env!("CARGO_PKG_VERSION"),
            "status": status,
            "last_load": last_load.map(|t| t.to_rfc3339()),
            "last_game_count": *last_count,
            "consecutive_errors": *errors
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::tests::{odds_row, FailingStore, MemoryStore};
    use crate::ingest::OddsStore;
    use std::time::Duration;

    fn state(store: impl OddsStore + 'static) -> AppState {
        AppState {
            service: Arc::new(OddsIngestionService::new(
                Arc::new(store),
                Duration::from_secs(5),
            )),
            health: HealthState::new(),
            default_sport: "nba".to_string(),
            default_window_hours: 48,
        }
    }

    fn query(start: &str, end: &str) -> Query<OddsQuery> {
        Query(OddsQuery {
            sport: Some("nba".to_string()),
            hours: None,
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        })
    }

    #[tokio::test]
    async fn test_missing_file_is_200_with_flag() {
        let (status, Json(body)) =
            odds_handler(State(state(MemoryStore { rows: None })), Query(OddsQuery::default()))
                .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["games"], json!([]));
        assert_eq!(body["meta"]["file_found"], false);
        assert_eq!(body["meta"]["rows_loaded"], 0);
        assert_eq!(body["meta"]["rows_filtered"], 0);
        assert_eq!(body["meta"]["sport"], "nba");
    }

    #[tokio::test]
    async fn test_grouped_games_in_body() {
        let rows = vec![
            odds_row("Boston Celtics", "Miami Heat", "2024-01-14T19:30:00Z", "draftkings", "h2h"),
            odds_row("Boston Celtics", "Miami Heat", "2024-01-14T19:30:00Z", "fanduel", "spreads"),
        ];
        let app = state(MemoryStore { rows: Some(rows) });

        let (status, Json(body)) = odds_handler(
            State(app.clone()),
            query("2024-01-14T00:00:00Z", "2024-01-15T00:00:00Z"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["games"].as_array().unwrap().len(), 1);
        assert_eq!(body["games"][0]["home_team_raw"], "Boston Celtics");
        assert_eq!(body["games"][0]["moneyline"][0]["market"], "h2h");
        assert_eq!(body["meta"]["rows_filtered"], 2);
        assert_eq!(*app.health.last_game_count.read().await, 1);
    }

    #[tokio::test]
    async fn test_read_failure_is_500() {
        let app = state(FailingStore);
        let (status, Json(body)) = odds_handler(
            State(app.clone()),
            query("2024-01-14T00:00:00Z", "2024-01-15T00:00:00Z"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["games"], json!([]));
        assert_eq!(body["meta"]["file_found"], true);
        assert!(body["error"].as_str().unwrap().contains("invalid magic bytes"));
        assert_eq!(*app.health.error_count.read().await, 1);
    }

    #[test]
    fn test_health_degrades_with_errors() {
        let app = state(FailingStore);

        tokio_test::block_on(async {
            let (status, Json(body)) = health_handler(State(app.clone())).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "ok");

            for _ in 0..11 {
                app.health.record_error().await;
            }
            let (status, Json(body)) = health_handler(State(app.clone())).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body["status"], "degraded");
            assert_eq!(body["consecutive_errors"], 11);
        });
    }
}
