//! Error types for cadence-engine operations.

use thiserror::Error;

/// Errors surfaced by the parsing helpers at the engine boundary.
///
/// Expansion itself never fails: a malformed recurrence payload demotes its
/// event to pass-through instead of erroring (see [`crate::expander`]).
#[derive(Error, Debug)]
pub enum EngineError {
    /// A timestamp string did not match any accepted ISO-8601 shape.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// The input was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input parsed as JSON but was not an array of objects.
    #[error("expected a JSON array of event objects")]
    NotAnArray,
}

/// Convenience alias used throughout cadence-engine.
pub type Result<T> = std::result::Result<T, EngineError>;
