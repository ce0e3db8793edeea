//! Compound event filtering: season -> sport -> team -> date, then a validity
//! pass that drops composite-id rows neither side of which could be resolved.

use crate::error::CriteriaError;
use crate::models::{RawEvent, Side};
use crate::resolver::{is_unresolved, resolve_matchup, resolve_name};
use crate::teams::TeamCatalog;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sentinel the UI sends for "no constraint"
const ALL: &str = "all";

/// Per-query filter. `None` means the stage passes everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub season: Option<i32>,
    pub sport_id: Option<i64>,
    pub team_name: Option<String>,
    pub date: Option<String>,
}

impl FilterCriteria {
    /// Build criteria from UI select values, where `""` and `"all"` mean unconstrained.
    /// A numeric field that does not parse is an error, never a pass-through.
    pub fn from_params(
        season: &str,
        sport_id: &str,
        team_name: &str,
        date: &str,
    ) -> Result<Self, CriteriaError> {
        Ok(Self {
            season: parse_number("season", season)?,
            sport_id: parse_number("sport_id", sport_id)?,
            team_name: constrained(team_name).map(str::to_string),
            date: constrained(date).map(str::to_string),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    raw: &str,
) -> Result<Option<T>, CriteriaError> {
    constrained(raw)
        .map(|value| {
            value.parse().map_err(|_| CriteriaError {
                field,
                value: value.to_string(),
            })
        })
        .transpose()
}

fn constrained(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(value)
    }
}

type Stage = fn(&RawEvent, &FilterCriteria, &TeamCatalog) -> bool;

/// Order matters: the team stage relies on the sport already being fixed.
const STAGES: &[(&str, Stage)] = &[
    ("season", season_matches),
    ("sport", sport_matches),
    ("team", team_matches),
    ("date", date_matches),
    ("validity", has_resolvable_team),
];

/// Apply every stage in order. Inputs are not modified; the result is a new
/// collection preserving input order. Re-filtering the output with the same
/// criteria returns it unchanged.
pub fn filter_events(
    events: &[RawEvent],
    criteria: &FilterCriteria,
    catalog: &TeamCatalog,
) -> Vec<RawEvent> {
    let mut kept: Vec<&RawEvent> = events.iter().collect();

    for (name, stage) in STAGES {
        let before = kept.len();
        kept.retain(|event| stage(*event, criteria, catalog));
        debug!("filter stage {}: {} -> {} events", name, before, kept.len());
    }

    kept.into_iter().cloned().collect()
}

fn season_matches(event: &RawEvent, criteria: &FilterCriteria, _: &TeamCatalog) -> bool {
    match criteria.season {
        None => true,
        Some(season) => event_season(event) == Some(season),
    }
}

/// Four-digit year prefix of the event date
fn event_season(event: &RawEvent) -> Option<i32> {
    let prefix = event.date.get(..4)?;
    if !prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

fn sport_matches(event: &RawEvent, criteria: &FilterCriteria, _: &TeamCatalog) -> bool {
    criteria.sport_id.map_or(true, |sport_id| event.sport_id == sport_id)
}

fn team_matches(event: &RawEvent, criteria: &FilterCriteria, catalog: &TeamCatalog) -> bool {
    match criteria.team_name.as_deref() {
        None => true,
        Some(team) => {
            resolve_name(event, Side::Home, catalog) == team
                || resolve_name(event, Side::Away, catalog) == team
        }
    }
}

fn date_matches(event: &RawEvent, criteria: &FilterCriteria, _: &TeamCatalog) -> bool {
    criteria.date.as_deref().map_or(true, |date| event.date == date)
}

/// Malformed upstream rows for composite-id sports resolve to TBD on both sides.
fn has_resolvable_team(event: &RawEvent, _: &FilterCriteria, catalog: &TeamCatalog) -> bool {
    if !catalog.uses_composite_ids(event.sport_id) {
        return true;
    }
    let (home, away) = resolve_matchup(event, catalog);
    !(is_unresolved(&home) && is_unresolved(&away))
}
