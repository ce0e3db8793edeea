//! Game lifecycle classification from a single event snapshot.

use crate::models::{GameState, GameStatus, RawEvent, Side, Winner};

const LIVE_MARKERS: &[&str] = &["live", "in_progress", "in progress", "status_in_progress"];
const FINAL_MARKERS: &[&str] = &["final", "completed", "status_final"];

/// Classify status and winner. Stateless; no transition history is consulted.
///
/// An in-progress marker always means Live, even when interim scores are
/// present. Otherwise a final marker or two parseable scores mean Final.
pub fn classify(event: &RawEvent) -> GameState {
    let status_marker = event
        .status
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    let scores = parse_scores(event);

    let status = if LIVE_MARKERS.contains(&status_marker.as_str()) {
        GameStatus::Live
    } else if FINAL_MARKERS.contains(&status_marker.as_str()) || scores.is_some() {
        GameStatus::Final
    } else {
        GameStatus::Scheduled
    };

    let winner = match (event.home_win, status, scores) {
        (Some(true), _, _) => Winner::Home,
        (Some(false), _, _) => Winner::Away,
        (None, GameStatus::Final, Some((home, away))) if home > away => Winner::Home,
        (None, GameStatus::Final, Some((home, away))) if away > home => Winner::Away,
        _ => Winner::None,
    };

    GameState { status, winner }
}

fn parse_scores(event: &RawEvent) -> Option<(f64, f64)> {
    Some((parse_score(event, Side::Home)?, parse_score(event, Side::Away)?))
}

fn parse_score(event: &RawEvent, side: Side) -> Option<f64> {
    event
        .score(side)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
}
