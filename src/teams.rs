//! Team reference data: directory, per-sport abbreviation tables and
//! composite event-id formats.
//!
//! Everything here is immutable once built. The resolver and filter pipeline
//! take a `&TeamCatalog` so tests can hand in small fixtures instead of the
//! built-in tables.

use crate::models::TeamDirectoryEntry;
use std::collections::HashMap;

/// Sport id the upstream feed uses for pro football
pub const NFL_SPORT_ID: i64 = 3;

/// Layout of a composite identifier that encodes both team codes,
/// e.g. `"2024_01_ARI_PHI"` (season, week, away, home).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeIdFormat {
    pub separator: char,
    pub token_count: usize,
    pub away_index: usize,
    pub home_index: usize,
}

impl CompositeIdFormat {
    /// `<season>_<week>_<AWAY>_<HOME>`
    pub const SEASON_WEEK_AWAY_HOME: Self = Self {
        separator: '_',
        token_count: 4,
        away_index: 2,
        home_index: 3,
    };
}

/// Immutable lookup tables consulted during name resolution
#[derive(Debug, Clone, Default)]
pub struct TeamCatalog {
    directory: HashMap<(i64, i64), String>,
    abbreviations: HashMap<i64, HashMap<String, String>>,
    composite_formats: HashMap<i64, CompositeIdFormat>,
}

impl TeamCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the built-in NFL abbreviation table and the
    /// season/week/away/home composite format for football event ids.
    pub fn with_builtin_tables() -> Self {
        Self::new()
            .with_abbreviations(NFL_SPORT_ID, NFL_ABBREVIATIONS)
            .with_composite_format(NFL_SPORT_ID, CompositeIdFormat::SEASON_WEEK_AWAY_HOME)
    }

    pub fn with_directory<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = TeamDirectoryEntry>,
    {
        for entry in entries {
            self.directory
                .insert((entry.sport_id, entry.team_id), entry.canonical_name);
        }
        self
    }

    pub fn with_abbreviations(mut self, sport_id: i64, table: &[(&str, &str)]) -> Self {
        let sport_table = self.abbreviations.entry(sport_id).or_default();
        for (alias, canonical) in table {
            sport_table.insert(normalize_alias(alias), canonical.to_string());
        }
        self
    }

    pub fn with_composite_format(mut self, sport_id: i64, format: CompositeIdFormat) -> Self {
        self.composite_formats.insert(sport_id, format);
        self
    }

    /// Canonical name for a team id within a sport
    pub fn lookup_team(&self, sport_id: i64, team_id: i64) -> Option<&str> {
        self.directory
            .get(&(sport_id, team_id))
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    /// Case-insensitive, whitespace-trimmed alias expansion
    pub fn expand_abbreviation(&self, sport_id: i64, alias: &str) -> Option<&str> {
        self.abbreviations
            .get(&sport_id)?
            .get(&normalize_alias(alias))
            .map(String::as_str)
    }

    pub fn composite_format(&self, sport_id: i64) -> Option<CompositeIdFormat> {
        self.composite_formats.get(&sport_id).copied()
    }

    /// Whether this sport's ids encode team codes (and so gets the validity post-filter)
    pub fn uses_composite_ids(&self, sport_id: i64) -> bool {
        self.composite_formats.contains_key(&sport_id)
    }
}

fn normalize_alias(alias: &str) -> String {
    alias.trim().to_lowercase()
}

/// Pro football team codes as they appear in composite event ids and feeds
pub const NFL_ABBREVIATIONS: &[(&str, &str)] = &[
    ("ARI", "Arizona Cardinals"),
    ("ATL", "Atlanta Falcons"),
    ("BAL", "Baltimore Ravens"),
    ("BUF", "Buffalo Bills"),
    ("CAR", "Carolina Panthers"),
    ("CHI", "Chicago Bears"),
    ("CIN", "Cincinnati Bengals"),
    ("CLE", "Cleveland Browns"),
    ("DAL", "Dallas Cowboys"),
    ("DEN", "Denver Broncos"),
    ("DET", "Detroit Lions"),
    ("GB", "Green Bay Packers"),
    ("HOU", "Houston Texans"),
    ("IND", "Indianapolis Colts"),
    ("JAX", "Jacksonville Jaguars"),
    ("KC", "Kansas City Chiefs"),
    ("LV", "Las Vegas Raiders"),
    ("LAC", "Los Angeles Chargers"),
    ("LA", "Los Angeles Rams"),
    ("LAR", "Los Angeles Rams"),
    ("MIA", "Miami Dolphins"),
    ("MIN", "Minnesota Vikings"),
    ("NE", "New England Patriots"),
    ("NO", "New Orleans Saints"),
    ("NYG", "New York Giants"),
    ("NYJ", "New York Jets"),
    ("PHI", "Philadelphia Eagles"),
    ("PIT", "Pittsburgh Steelers"),
    ("SF", "San Francisco 49ers"),
    ("SEA", "Seattle Seahawks"),
    ("TB", "Tampa Bay Buccaneers"),
    ("TEN", "Tennessee Titans"),
    ("WAS", "Washington Commanders"),
    ("WSH", "Washington Commanders"),
];
