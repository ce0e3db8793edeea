//! Odds ingestion: load a sport's rows, keep the time window, group by matchup.

pub mod grouping;
pub mod store;

pub use grouping::{group_odds, normalize_team_key, parse_commence_time, OddsWindow};
pub use store::{odds_file_for_sport, OddsStore, ParquetOddsStore, DEFAULT_SPORT};

use crate::error::IngestionError;
use crate::models::GameOddsAggregate;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Counters and window echoed back to the caller with every load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsMeta {
    pub sport: String,
    pub file_found: bool,
    pub rows_loaded: usize,
    #[serde(rename = "rows_filtered")]
    pub rows_after_time_filter: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl OddsMeta {
    fn empty(sport: &str, window: &OddsWindow, file_found: bool) -> Self {
        Self {
            sport: sport.to_string(),
            file_found,
            rows_loaded: 0,
            rows_after_time_filter: 0,
            start: window.start,
            end: window.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsLoad {
    pub games: Vec<GameOddsAggregate>,
    pub meta: OddsMeta,
}

/// A genuine read failure. `meta` reports `file_found = true` and zero rows.
#[derive(Debug)]
pub struct IngestionFailure {
    pub meta: OddsMeta,
    pub error: IngestionError,
}

/// Query parameters as they arrive from the HTTP layer, all optional
#[derive(Debug, Clone, Default)]
pub struct OddsRequest {
    pub sport: Option<String>,
    pub hours: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl OddsRequest {
    /// Sport key, lowercased; blank means the default sport.
    pub fn sport(&self, default_sport: &str) -> String {
        self.sport
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_sport.to_string())
    }

    /// `start` defaults to `now`, `end` to `start + hours`. Values that do not
    /// parse, or push `end` out of the representable range, fall back to their
    /// defaults.
    pub fn window(&self, default_hours: i64, now: DateTime<Utc>) -> OddsWindow {
        let hours = match self.hours.as_deref().map(str::trim) {
            None | Some("") => default_hours,
            Some(raw) => raw.parse::<i64>().unwrap_or_else(|_| {
                warn!("Ignoring invalid hours={:?}, using {}", raw, default_hours);
                default_hours
            }),
        };

        let start = parse_instant(self.start.as_deref(), "start").unwrap_or(now);
        let end = match parse_instant(self.end.as_deref(), "end") {
            Some(end) => end,
            None => offset_hours(start, hours)
                .or_else(|| {
                    warn!("Ignoring out of range hours={}, using {}", hours, default_hours);
                    offset_hours(start, default_hours)
                })
                .unwrap_or(start),
        };

        OddsWindow { start, end }
    }
}

fn offset_hours(start: DateTime<Utc>, hours: i64) -> Option<DateTime<Utc>> {
    ChronoDuration::try_hours(hours).and_then(|delta| start.checked_add_signed(delta))
}

fn parse_instant(raw: Option<&str>, name: &str) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = parse_commence_time(raw);
    if parsed.is_none() {
        warn!("Ignoring invalid {}={:?}", name, raw);
    }
    parsed
}

/// Loads and groups odds rows for one sport per call. Holds no state between calls.
pub struct OddsIngestionService {
    store: Arc<dyn OddsStore>,
    read_timeout: Duration,
}

impl OddsIngestionService {
    pub fn new(store: Arc<dyn OddsStore>, read_timeout: Duration) -> Self {
        Self {
            store,
            read_timeout,
        }
    }

    pub async fn load_odds(
        &self,
        sport: &str,
        window: &OddsWindow,
    ) -> Result<OddsLoad, IngestionFailure> {
        let read = tokio::time::timeout(self.read_timeout, self.store.read_rows(sport))
            .await
            .unwrap_or_else(|_| {
                Err(IngestionError::Timeout {
                    seconds: self.read_timeout.as_secs(),
                })
            });

        let rows = match read {
            Ok(Some(rows)) => rows,
            Ok(None) => {
                return Ok(OddsLoad {
                    games: Vec::new(),
                    meta: OddsMeta::empty(sport, window, false),
                });
            }
            Err(error) => {
                warn!("Odds load for {} failed: {}", sport, error);
                return Err(IngestionFailure {
                    meta: OddsMeta::empty(sport, window, true),
                    error,
                });
            }
        };

        let rows_loaded = rows.len();
        let in_window = grouping::filter_by_window(rows, window);
        let rows_after_time_filter = in_window.len();
        let games = group_odds(&in_window);

        info!(
            "Loaded {} odds rows for {} ({} in window) into {} games",
            rows_loaded,
            sport,
            rows_after_time_filter,
            games.len()
        );

        Ok(OddsLoad {
            games,
            meta: OddsMeta {
                sport: sport.to_string(),
                file_found: true,
                rows_loaded,
                rows_after_time_filter,
                start: window.start,
                end: window.end,
            },
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::OddsRow;
    use async_trait::async_trait;
    use chrono::TimeZone;

    /// In-memory store; `None` rows means "no file"
    pub(crate) struct MemoryStore {
        pub rows: Option<Vec<OddsRow>>,
    }

    #[async_trait]
    impl OddsStore for MemoryStore {
        async fn read_rows(&self, _sport: &str) -> Result<Option<Vec<OddsRow>>, IngestionError> {
            Ok(self.rows.clone())
        }
    }

    pub(crate) struct FailingStore;

    #[async_trait]
    impl OddsStore for FailingStore {
        async fn read_rows(&self, sport: &str) -> Result<Option<Vec<OddsRow>>, IngestionError> {
            Err(IngestionError::ReadFailure {
                path: format!("{}_odds.parquet", sport),
                message: "invalid magic bytes".to_string(),
            })
        }
    }

    struct SlowStore;

    #[async_trait]
    impl OddsStore for SlowStore {
        async fn read_rows(&self, _sport: &str) -> Result<Option<Vec<OddsRow>>, IngestionError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Some(Vec::new()))
        }
    }

    pub(crate) fn odds_row(home: &str, away: &str, time: &str, book: &str, market: &str) -> OddsRow {
        OddsRow {
            sport: "basketball_nba".to_string(),
            commence_time: time.to_string(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            bookmaker: book.to_string(),
            market: market.to_string(),
            outcome_name: home.to_string(),
            price: Some(-120.0),
            point: None,
            last_update: Some("2024-01-14T12:00:00Z".to_string()),
            source: "the_odds_api".to_string(),
        }
    }

    fn window() -> OddsWindow {
        OddsWindow {
            start: Utc.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap(),
        }
    }

    fn service(store: impl OddsStore + 'static) -> OddsIngestionService {
        OddsIngestionService::new(Arc::new(store), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_missing_source_is_empty_not_error() {
        let load = service(MemoryStore { rows: None })
            .load_odds("nba", &window())
            .await
            .unwrap();

        assert!(load.games.is_empty());
        assert!(!load.meta.file_found);
        assert_eq!(load.meta.rows_loaded, 0);
        assert_eq!(load.meta.rows_after_time_filter, 0);
    }

    #[tokio::test]
    async fn test_loads_filters_and_groups() {
        let rows = vec![
            odds_row("Boston Celtics", "Miami Heat", "2024-01-14T19:30:00Z", "draftkings", "h2h"),
            odds_row("Boston Celtics", "Miami Heat", "2024-01-14T19:30:00Z", "fanduel", "h2h"),
            odds_row("boston celtics", "MIAMI HEAT", "2024-01-14T19:30:00Z", "fanduel", "spreads"),
            odds_row("Boston Celtics", "Miami Heat", "2024-01-20T19:30:00Z", "fanduel", "h2h"),
            odds_row("Boston Celtics", "Miami Heat", "tbd", "fanduel", "h2h"),
        ];

        let load = service(MemoryStore { rows: Some(rows) })
            .load_odds("nba", &window())
            .await
            .unwrap();

        assert!(load.meta.file_found);
        assert_eq!(load.meta.rows_loaded, 5);
        assert_eq!(load.meta.rows_after_time_filter, 3);
        assert_eq!(load.games.len(), 1);
        assert_eq!(load.games[0].moneyline.len(), 2);
        assert_eq!(load.games[0].spreads.len(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_reports_file_found() {
        let failure = service(FailingStore)
            .load_odds("nfl", &window())
            .await
            .unwrap_err();

        assert!(failure.meta.file_found);
        assert_eq!(failure.meta.rows_loaded, 0);
        assert!(matches!(failure.error, IngestionError::ReadFailure { .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_an_ingestion_failure() {
        let service = OddsIngestionService::new(Arc::new(SlowStore), Duration::from_millis(50));
        let failure = service.load_odds("nba", &window()).await.unwrap_err();

        assert!(failure.meta.file_found);
        assert!(matches!(failure.error, IngestionError::Timeout { .. }));
    }

    #[test]
    fn test_request_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap();
        let request = OddsRequest::default();

        assert_eq!(request.sport(DEFAULT_SPORT), "nba");
        let window = request.window(48, now);
        assert_eq!(window.start, now);
        assert_eq!(window.end, now + ChronoDuration::hours(48));
    }

    #[test]
    fn test_request_explicit_values() {
        let now = Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap();
        let request = OddsRequest {
            sport: Some(" NFL ".to_string()),
            hours: Some("6".to_string()),
            start: Some("2024-02-01T00:00:00Z".to_string()),
            end: None,
        };

        assert_eq!(request.sport(DEFAULT_SPORT), "nfl");
        let window = request.window(48, now);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 2, 1, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_request_invalid_values_fall_back() {
        let now = Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap();
        let request = OddsRequest {
            sport: Some("".to_string()),
            hours: Some("lots".to_string()),
            start: Some("yesterday".to_string()),
            end: Some("2024-01-14T18:00:00Z".to_string()),
        };

        assert_eq!(request.sport("nba"), "nba");
        let window = request.window(48, now);
        assert_eq!(window.start, now);
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 1, 14, 18, 0, 0).unwrap());
    }

    #[test]
    fn test_request_huge_hours_fall_back() {
        let now = Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap();

        // past the calendar range, and past the duration range
        for hours in ["10000000000", "9000000000000", "-9000000000000"] {
            let request = OddsRequest {
                hours: Some(hours.to_string()),
                ..Default::default()
            };
            let window = request.window(48, now);
            assert_eq!(window.start, now);
            assert_eq!(window.end, now + ChronoDuration::hours(48), "hours={}", hours);
        }
    }

    #[tokio::test]
    async fn test_unreadable_data_dir_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("odds");
        std::fs::write(&not_a_dir, b"plain file").unwrap();

        let failure = service(ParquetOddsStore::new(&not_a_dir))
            .load_odds("nba", &window())
            .await
            .unwrap_err();

        assert!(failure.meta.file_found);
        assert!(matches!(failure.error, IngestionError::ReadFailure { .. }));
    }

    #[test]
    fn test_meta_serializes_rows_filtered() {
        let meta = OddsMeta::empty("nba", &window(), false);
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["rows_filtered"], 0);
        assert_eq!(json["file_found"], false);
        assert!(json.get("rows_after_time_filter").is_none());
    }
}
