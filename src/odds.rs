//! Odds source selection and display formatting.

use crate::models::{OddsSource, OddsView, PredictionLogEntry, RawEvent};
use serde::{Deserialize, Serialize};

/// Confidence bucket for the gap between two win probabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeBucket {
    Coinflip,
    Lean,
    Strong,
}

impl EdgeBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeBucket::Coinflip => "Coinflip",
            EdgeBucket::Lean => "Lean",
            EdgeBucket::Strong => "Strong",
        }
    }
}

const COINFLIP_EDGE: f64 = 0.05;
const LEAN_EDGE: f64 = 0.15;

/// American odds chosen for display, before formatting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OddsSelection {
    pub source: OddsSource,
    pub home: Option<f64>,
    pub away: Option<f64>,
}

/// Sportsbook odds when both sides are quoted, model odds otherwise.
pub fn select_odds(event: &RawEvent) -> OddsSelection {
    let home = present(event.sportsbook_home_odds);
    let away = present(event.sportsbook_away_odds);

    if home.is_some() && away.is_some() {
        OddsSelection {
            source: OddsSource::Sportsbook,
            home,
            away,
        }
    } else {
        OddsSelection {
            source: OddsSource::Model,
            home: present(event.model_home_odds),
            away: present(event.model_away_odds),
        }
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// `+120` for positive odds, unchanged otherwise; `None` for missing/NaN.
pub fn format_american(value: Option<f64>) -> Option<String> {
    let value = present(value)?;
    if value > 0.0 {
        Some(format!("+{}", value))
    } else {
        Some(format!("{}", value))
    }
}

/// Payout multiple for a win probability, e.g. `0.5` -> `"2.00x"`.
pub fn implied_odds(prob: Option<f64>) -> String {
    match prob {
        Some(p) if p > 0.0 && p.is_finite() => format!("{:.2}x", 1.0 / p),
        _ => "-".to_string(),
    }
}

/// Bucket for the absolute probability gap. A NaN or infinite gap carries no
/// signal and lands in `Coinflip`.
pub fn classify_edge(p_home: f64, p_away: f64) -> EdgeBucket {
    let edge = (p_home - p_away).abs();
    if !edge.is_finite() || edge < COINFLIP_EDGE {
        EdgeBucket::Coinflip
    } else if edge < LEAN_EDGE {
        EdgeBucket::Lean
    } else {
        EdgeBucket::Strong
    }
}

impl OddsView {
    pub fn from_event(event: &RawEvent) -> Self {
        let selection = select_odds(event);
        Self {
            source: selection.source,
            home: format_american(selection.home),
            away: format_american(selection.away),
        }
    }
}

/// Keep prediction log entries in the requested bucket; `None` keeps everything.
pub fn filter_predictions(
    entries: &[PredictionLogEntry],
    bucket: Option<EdgeBucket>,
) -> Vec<PredictionLogEntry> {
    entries
        .iter()
        .filter(|entry| bucket.map_or(true, |b| classify_edge(entry.p_home, entry.p_away) == b))
        .cloned()
        .collect()
}
