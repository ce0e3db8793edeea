//! Shared record types for raw provider events, normalized views and odds rows.

use serde::{Deserialize, Deserializer, Serialize};

/// Which side of a matchup a lookup concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

/// Raw event as supplied by the upstream data-access layer.
///
/// Field names and nullability mirror the provider payload. `event_id` and the
/// two score fields arrive as either JSON strings or numbers depending on the
/// sport feed, so they are kept as strings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RawEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub event_id: String,
    pub sport_id: i64,
    pub date: String,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub home_team_name: Option<String>,
    pub away_team_name: Option<String>,
    pub venue: Option<String>,
    pub status: Option<String>,
    #[serde(deserialize_with = "opt_string_or_number")]
    pub home_score: Option<String>,
    #[serde(deserialize_with = "opt_string_or_number")]
    pub away_score: Option<String>,
    pub home_win: Option<bool>,
    pub model_home_odds: Option<f64>,
    pub model_away_odds: Option<f64>,
    pub sportsbook_home_odds: Option<f64>,
    pub sportsbook_away_odds: Option<f64>,
}

impl RawEvent {
    pub fn team_id(&self, side: Side) -> Option<i64> {
        match side {
            Side::Home => self.home_team_id,
            Side::Away => self.away_team_id,
        }
    }

    pub fn team_name(&self, side: Side) -> Option<&str> {
        match side {
            Side::Home => self.home_team_name.as_deref(),
            Side::Away => self.away_team_name.as_deref(),
        }
    }

    pub fn score(&self, side: Side) -> Option<&str> {
        match side {
            Side::Home => self.home_score.as_deref(),
            Side::Away => self.away_score.as_deref(),
        }
    }
}

/// One row of the team directory reference set
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TeamDirectoryEntry {
    pub team_id: i64,
    pub sport_id: i64,
    pub canonical_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    Live,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Home,
    Away,
    None,
}

/// Snapshot classification of a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub status: GameStatus,
    pub winner: Winner,
}

/// Where the displayed odds came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsSource {
    Sportsbook,
    Model,
}

/// Display-ready odds for a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OddsView {
    pub source: OddsSource,
    pub home: Option<String>,
    pub away: Option<String>,
}

/// Derived per-event view handed to the UI. Rebuilt from scratch on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedGameView {
    pub event_id: String,
    pub sport_id: i64,
    pub date: String,
    pub home_name: String,
    pub away_name: String,
    pub status: GameStatus,
    pub winner: Winner,
    pub odds_view: OddsView,
}

/// Markets the grouping service keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    #[serde(rename = "h2h")]
    Moneyline,
    #[serde(rename = "spreads")]
    Spread,
}

impl Market {
    /// Maps a storage market tag; `None` for markets that are not grouped (totals, props...)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "h2h" => Some(Market::Moneyline),
            "spreads" => Some(Market::Spread),
            _ => None,
        }
    }
}

/// A single raw row from columnar odds storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OddsRow {
    pub sport: String,
    pub commence_time: String,
    pub home_team: String,
    pub away_team: String,
    pub bookmaker: String,
    pub market: String,
    pub outcome_name: String,
    pub price: Option<f64>,
    pub point: Option<f64>,
    pub last_update: Option<String>,
    pub source: String,
}

/// One bookmaker quote for one outcome of a grouped market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsRecord {
    pub sport: String,
    pub commence_time: String,
    pub home_team_raw: String,
    pub away_team_raw: String,
    pub bookmaker: String,
    pub market: Market,
    pub outcome_name: String,
    pub price: Option<f64>,
    pub point: Option<f64>,
    pub last_update: Option<String>,
    pub source: String,
}

impl OddsRecord {
    pub fn from_row(row: &OddsRow, market: Market) -> Self {
        Self {
            sport: row.sport.clone(),
            commence_time: row.commence_time.clone(),
            home_team_raw: row.home_team.clone(),
            away_team_raw: row.away_team.clone(),
            bookmaker: row.bookmaker.clone(),
            market,
            outcome_name: row.outcome_name.clone(),
            price: row.price,
            point: row.point,
            last_update: row.last_update.clone(),
            source: row.source.clone(),
        }
    }
}

/// All quotes for one matchup at one kickoff time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOddsAggregate {
    pub home_team_raw: String,
    pub away_team_raw: String,
    pub commence_time: String,
    pub moneyline: Vec<OddsRecord>,
    pub spreads: Vec<OddsRecord>,
}

impl GameOddsAggregate {
    pub fn row_count(&self) -> usize {
        self.moneyline.len() + self.spreads.len()
    }
}

/// A logged model prediction, filtered by edge bucket in the admin views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionLogEntry {
    pub event_id: String,
    pub sport_id: i64,
    pub date: String,
    pub p_home: f64,
    pub p_away: f64,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.unwrap_or_default())
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_event_accepts_numeric_ids_and_scores() {
        let event: RawEvent = serde_json::from_str(
            r#"{"event_id": 17, "sport_id": 1, "date": "2024-01-14",
                "home_score": 101, "away_score": "99", "home_team_name": null}"#,
        )
        .unwrap();

        assert_eq!(event.event_id, "17");
        assert_eq!(event.home_score.as_deref(), Some("101"));
        assert_eq!(event.away_score.as_deref(), Some("99"));
        assert_eq!(event.home_team_name, None);
        assert_eq!(event.status, None);
    }

    #[test]
    fn test_market_tags() {
        assert_eq!(Market::from_tag("h2h"), Some(Market::Moneyline));
        assert_eq!(Market::from_tag("spreads"), Some(Market::Spread));
        assert_eq!(Market::from_tag("totals"), None);
        assert_eq!(serde_json::to_string(&Market::Moneyline).unwrap(), "\"h2h\"");
    }
}
