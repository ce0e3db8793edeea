//! Team identity resolution.
//!
//! A display name is resolved by walking an ordered list of pure stages; the
//! first stage that yields a non-empty name wins:
//!
//! 1. explicit name on the record
//! 2. directory lookup by team id, expanded through the sport's abbreviation table
//! 3. team code parsed out of a composite event identifier
//! 4. `"TBD"`

use crate::models::{RawEvent, Side};
use crate::teams::TeamCatalog;

/// Placeholder for a side that no stage could resolve
pub const UNRESOLVED_TEAM: &str = "TBD";

type Stage = fn(&RawEvent, Side, &TeamCatalog) -> Option<String>;

const STAGES: &[Stage] = &[explicit_name, directory_name, composite_id_name];

/// Resolve the display name for one side of an event. Never empty.
pub fn resolve_name(event: &RawEvent, side: Side, catalog: &TeamCatalog) -> String {
    STAGES
        .iter()
        .find_map(|stage| stage(event, side, catalog).filter(|name| !name.trim().is_empty()))
        .unwrap_or_else(|| UNRESOLVED_TEAM.to_string())
}

/// Resolve both sides, `(home, away)`
pub fn resolve_matchup(event: &RawEvent, catalog: &TeamCatalog) -> (String, String) {
    (
        resolve_name(event, Side::Home, catalog),
        resolve_name(event, Side::Away, catalog),
    )
}

pub fn is_unresolved(name: &str) -> bool {
    name == UNRESOLVED_TEAM
}

/// The provider's own name is authoritative and returned as given.
fn explicit_name(event: &RawEvent, side: Side, _catalog: &TeamCatalog) -> Option<String> {
    event
        .team_name(side)
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
}

fn directory_name(event: &RawEvent, side: Side, catalog: &TeamCatalog) -> Option<String> {
    let team_id = event.team_id(side)?;
    let name = catalog.lookup_team(event.sport_id, team_id)?;
    Some(expand_abbreviation(event.sport_id, name, catalog))
}

/// Directory entries for some sports hold short codes; swap in the full name when known.
fn expand_abbreviation(sport_id: i64, name: &str, catalog: &TeamCatalog) -> String {
    catalog
        .expand_abbreviation(sport_id, name)
        .unwrap_or(name)
        .to_string()
}

fn composite_id_name(event: &RawEvent, side: Side, catalog: &TeamCatalog) -> Option<String> {
    let format = catalog.composite_format(event.sport_id)?;

    [event.event_id.as_str(), event.date.as_str()]
        .into_iter()
        .find_map(|candidate| {
            let tokens: Vec<&str> = candidate.trim().split(format.separator).collect();
            if tokens.len() != format.token_count {
                return None;
            }
            let index = match side {
                Side::Home => format.home_index,
                Side::Away => format.away_index,
            };
            let code = tokens.get(index)?.trim();
            if code.is_empty() {
                return None;
            }
            Some(
                catalog
                    .expand_abbreviation(event.sport_id, code)
                    .map(str::to_string)
                    .unwrap_or_else(|| code.to_uppercase()),
            )
        })
}
