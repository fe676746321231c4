//! Library error types.

use thiserror::Error;

/// Errors returned by slot selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("duration must be > 0 minutes, got {0}")]
    NonPositiveDuration(i64),
}

/// Errors that can occur while obtaining forecast data.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("forecast service returned HTTP {0}")]
    Status(u16),

    #[error("invalid forecast payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cannot read forecast: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid `{field}` timestamp \"{value}\"")]
    Timestamp { field: &'static str, value: String },
}

pub type ForecastResult<T> = Result<T, ForecastError>;
