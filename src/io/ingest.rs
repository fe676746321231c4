//! Loading forecast records from JSON files.

use std::fs;
use std::path::Path;

use crate::error::ForecastResult;
use crate::forecast::{ForecastRecord, ForecastResponse};

/// Reads forecast records from a JSON file.
///
/// The file may hold a saved service response (`{"data": [...]}`) or a
/// plain array of records.
///
/// # Errors
///
/// Returns [`ForecastError::Io`](crate::error::ForecastError::Io) if the file
/// cannot be read and
/// [`ForecastError::Decode`](crate::error::ForecastError::Decode) if it is not
/// valid forecast JSON.
pub fn load_forecast_file(path: &Path) -> ForecastResult<Vec<ForecastRecord>> {
    let raw = fs::read_to_string(path)?;
    parse_forecast_json(&raw)
}

/// Parses forecast records from a JSON string.
///
/// # Errors
///
/// Returns [`ForecastError::Decode`](crate::error::ForecastError::Decode) if
/// the input is not valid forecast JSON.
pub fn parse_forecast_json(raw: &str) -> ForecastResult<Vec<ForecastRecord>> {
    // A bare array is decoded directly; anything else must be the envelope
    if raw.trim_start().starts_with('[') {
        Ok(serde_json::from_str(raw)?)
    } else {
        let response: ForecastResponse = serde_json::from_str(raw)?;
        Ok(response.data)
    }
}
