//! Error types for the wellness score crate
//!
//! The scoring engine itself is total and never returns these. They are raised
//! at the edges: decoding metrics or records, reading configuration, and
//! talking to a data source.

use thiserror::Error;

/// Errors that can occur outside the scoring core
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid health metrics: {0}")]
    InvalidMetrics(String),

    #[error("Invalid health record: {0}")]
    InvalidRecord(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Health data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
