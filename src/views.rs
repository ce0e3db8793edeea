//! Builds the UI-facing game view from a raw event.

use crate::classifier::classify;
use crate::models::{NormalizedGameView, OddsView, RawEvent};
use crate::resolver::resolve_matchup;
use crate::teams::TeamCatalog;

pub fn build_view(event: &RawEvent, catalog: &TeamCatalog) -> NormalizedGameView {
    let (home_name, away_name) = resolve_matchup(event, catalog);
    let state = classify(event);

    NormalizedGameView {
        event_id: event.event_id.clone(),
        sport_id: event.sport_id,
        date: event.date.clone(),
        home_name,
        away_name,
        status: state.status,
        winner: state.winner,
        odds_view: OddsView::from_event(event),
    }
}

pub fn build_views(events: &[RawEvent], catalog: &TeamCatalog) -> Vec<NormalizedGameView> {
    events.iter().map(|event| build_view(event, catalog)).collect()
}
