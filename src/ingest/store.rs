//! Columnar odds storage: one Parquet file per sport in a data directory.

use crate::error::IngestionError;
use crate::models::OddsRow;
use async_trait::async_trait;
use chrono::DateTime;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sport used when a request names a sport with no file of its own
pub const DEFAULT_SPORT: &str = "nba";

const SPORT_FILES: &[(&str, &str)] = &[
    ("nba", "nba_odds.parquet"),
    ("ncaab", "ncaab_odds.parquet"),
    ("nfl", "nfl_odds.parquet"),
    ("ncaaf", "ncaaf_odds.parquet"),
    ("nhl", "nhl_odds.parquet"),
    ("mlb", "mlb_odds.parquet"),
];

/// File name for a sport key; unknown keys map to the default sport's file.
pub fn odds_file_for_sport(sport: &str) -> &'static str {
    let sport = sport.trim().to_lowercase();
    SPORT_FILES
        .iter()
        .find(|(key, _)| *key == sport)
        .or_else(|| SPORT_FILES.iter().find(|(key, _)| *key == DEFAULT_SPORT))
        .map(|(_, file)| *file)
        .unwrap_or("nba_odds.parquet")
}

/// Source of raw odds rows for a sport.
#[async_trait]
pub trait OddsStore: Send + Sync {
    /// All rows for the sport, or `Ok(None)` when the sport has no source.
    async fn read_rows(&self, sport: &str) -> Result<Option<Vec<OddsRow>>, IngestionError>;
}

pub struct ParquetOddsStore {
    data_dir: PathBuf,
}

impl ParquetOddsStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, sport: &str) -> PathBuf {
        self.data_dir.join(odds_file_for_sport(sport))
    }
}

#[async_trait]
impl OddsStore for ParquetOddsStore {
    async fn read_rows(&self, sport: &str) -> Result<Option<Vec<OddsRow>>, IngestionError> {
        let path = self.path_for(sport);

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => {
                info!("No odds file for {} at {}", sport, path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(IngestionError::ReadFailure {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        }

        let rows = tokio::task::spawn_blocking(move || read_parquet_rows(&path))
            .await
            .map_err(|e| IngestionError::Worker(e.to_string()))??;

        Ok(Some(rows))
    }
}

fn read_parquet_rows(path: &Path) -> Result<Vec<OddsRow>, IngestionError> {
    let read_failure = |message: String| IngestionError::ReadFailure {
        path: path.display().to_string(),
        message,
    };

    let file = File::open(path).map_err(|e| read_failure(e.to_string()))?;
    let reader = SerializedFileReader::new(file).map_err(|e| read_failure(e.to_string()))?;
    let iter = reader
        .get_row_iter(None)
        .map_err(|e| read_failure(e.to_string()))?;

    let mut rows = Vec::new();
    for row in iter {
        let row = row.map_err(|e| read_failure(e.to_string()))?;
        let mut odds_row = OddsRow::default();
        for (column, field) in row.get_column_iter() {
            apply_column(&mut odds_row, column, field);
        }
        rows.push(odds_row);
    }

    debug!("Read {} odds rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn apply_column(row: &mut OddsRow, column: &str, field: &Field) {
    match column {
        "sport" | "sport_key" => row.sport = field_text(field).unwrap_or_default(),
        "commence_time" => row.commence_time = field_text(field).unwrap_or_default(),
        "home_team" => row.home_team = field_text(field).unwrap_or_default(),
        "away_team" => row.away_team = field_text(field).unwrap_or_default(),
        "bookmaker" => row.bookmaker = field_text(field).unwrap_or_default(),
        "market" | "market_key" => row.market = field_text(field).unwrap_or_default(),
        "outcome_name" | "outcome" => row.outcome_name = field_text(field).unwrap_or_default(),
        "price" => row.price = field_number(field),
        "point" => row.point = field_number(field),
        "last_update" => row.last_update = field_text(field),
        "source" => row.source = field_text(field).unwrap_or_default(),
        _ => {}
    }
}

/// Strings pass through; timestamp columns become RFC 3339 text so the raw
/// commence time stays a string everywhere downstream.
fn field_text(field: &Field) -> Option<String> {
    match field {
        Field::Str(s) => Some(s.clone()),
        Field::TimestampMillis(ms) => DateTime::from_timestamp_millis(*ms).map(|t| t.to_rfc3339()),
        Field::TimestampMicros(us) => DateTime::from_timestamp_micros(*us).map(|t| t.to_rfc3339()),
        Field::Long(v) => Some(v.to_string()),
        Field::Int(v) => Some(v.to_string()),
        _ => None,
    }
}

fn field_number(field: &Field) -> Option<f64> {
    match field {
        Field::Double(v) => Some(*v),
        Field::Float(v) => Some(*v as f64),
        Field::Long(v) => Some(*v as f64),
        Field::Int(v) => Some(*v as f64),
        Field::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}
