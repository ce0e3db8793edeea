use thiserror::Error;

/// Failures of the odds storage read. A missing file is not one of these;
/// stores report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("failed to read odds file {path}: {message}")]
    ReadFailure { path: String, message: String },

    #[error("odds read timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("odds read worker failed: {0}")]
    Worker(String),
}

/// A filter value from the UI that is neither a sentinel nor parseable.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {field} filter value {value:?}")]
pub struct CriteriaError {
    pub field: &'static str,
    pub value: String,
}
