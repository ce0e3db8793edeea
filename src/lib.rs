//! Normalization and filtering layer for sports event feeds.
//!
//! - `resolver` / `classifier` / `odds` / `views`: pure per-event transforms
//! - `filter`: ordered compound filtering over event collections
//! - `ingest`: Parquet-backed odds loading and per-matchup grouping
//! - `api`: axum handlers exposing odds ingestion over HTTP

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod models;
pub mod odds;
pub mod resolver;
pub mod teams;
pub mod views;

pub use classifier::classify;
pub use error::{CriteriaError, IngestionError};
pub use filter::{filter_events, FilterCriteria};
pub use ingest::{OddsIngestionService, OddsLoad, OddsMeta, OddsWindow};
pub use models::*;
pub use odds::{classify_edge, format_american, implied_odds, select_odds, EdgeBucket};
pub use resolver::{resolve_matchup, resolve_name, UNRESOLVED_TEAM};
pub use teams::TeamCatalog;
pub use views::{build_view, build_views};
