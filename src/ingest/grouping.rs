//! Time-window filtering and per-matchup grouping of raw odds rows.

use crate::models::{GameOddsAggregate, Market, OddsRecord, OddsRow};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashMap;

/// Inclusive `[start, end]` window on commence time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OddsWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl OddsWindow {
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Grouping-only spellings that differ between books
const TEAM_KEY_ALIASES: &[(&str, &str)] = &[
    ("la clippers", "los angeles clippers"),
    ("la lakers", "los angeles lakers"),
    ("ny knicks", "new york knicks"),
    ("gs warriors", "golden state warriors"),
    ("okc thunder", "oklahoma city thunder"),
    ("sa spurs", "san antonio spurs"),
    ("no pelicans", "new orleans pelicans"),
    ("la rams", "los angeles rams"),
    ("la chargers", "los angeles chargers"),
    ("ny giants", "new york giants"),
    ("ny jets", "new york jets"),
    ("washington football team", "washington commanders"),
];

/// Normalized team string used only inside the grouping key.
///
/// Lowercases, turns every non-alphanumeric character into a space, collapses
/// whitespace and applies `TEAM_KEY_ALIASES`.
pub fn normalize_team_key(name: &str) -> String {
    let spaced: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    TEAM_KEY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == collapsed)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(collapsed)
}

/// Parse a storage commence time. RFC 3339 first, then a naive
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` read as UTC.
pub fn parse_commence_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Drop rows with unparsable commence times and rows outside the window.
pub fn filter_by_window(rows: Vec<OddsRow>, window: &OddsWindow) -> Vec<OddsRow> {
    rows.into_iter()
        .filter(|row| {
            parse_commence_time(&row.commence_time)
                .map(|time| window.contains(time))
                .unwrap_or(false)
        })
        .collect()
}

/// Collapse rows into one aggregate per (home, away, commence time).
///
/// The first row for a key seeds the aggregate with its original team strings.
/// Aggregates come back in first-seen order. Rows for markets other than
/// moneyline and spreads are skipped.
pub fn group_odds(rows: &[OddsRow]) -> Vec<GameOddsAggregate> {
    let mut index: HashMap<(String, String, String), usize> = HashMap::new();
    let mut games: Vec<GameOddsAggregate> = Vec::new();

    for row in rows {
        let key = (
            normalize_team_key(&row.home_team),
            normalize_team_key(&row.away_team),
            row.commence_time.clone(),
        );

        let slot = *index.entry(key).or_insert_with(|| {
            games.push(GameOddsAggregate {
                home_team_raw: row.home_team.clone(),
                away_team_raw: row.away_team.clone(),
                commence_time: row.commence_time.clone(),
                moneyline: Vec::new(),
                spreads: Vec::new(),
            });
            games.len() - 1
        });

        let Some(market) = Market::from_tag(&row.market) else {
            continue;
        };
        let record = OddsRecord::from_row(row, market);
        match market {
            Market::Moneyline => games[slot].moneyline.push(record),
            Market::Spread => games[slot].spreads.push(record),
        }
    }

    games
}
