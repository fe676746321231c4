//! API query and error types.
//!
//! The slot body itself is [`SlotRecord`](crate::slots::SlotRecord).

use serde::{Deserialize, Serialize};

/// Query parameters for the slots endpoint.
///
/// Both are kept as raw strings: a value that fails to parse falls back to
/// the configured default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SlotsQuery {
    /// Activity duration in minutes.
    pub duration: Option<String>,
    /// Whether a single contiguous slot is wanted.
    pub contiguous: Option<String>,
}

impl SlotsQuery {
    /// Requested duration, or `default` when absent or unparsable.
    pub fn duration_or(&self, default: i64) -> i64 {
        self.duration
            .as_deref()
            .and_then(|d| d.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Requested contiguity, or `default` when absent or unparsable.
    pub fn contiguous_or(&self, default: bool) -> bool {
        self.contiguous
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(default)
    }
}

/// Parses the boolean spellings accepted by the endpoint.
pub fn parse_flag(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
