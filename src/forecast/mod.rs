//! Forecast sources and the wire format of carbon-intensity records.
//!
//! Records arrive as strings exactly as the GB carbon-intensity service
//! publishes them. [`parse_records`] turns them into
//! [`ForecastBucket`](crate::slots::ForecastBucket)s, skipping any whose
//! timestamps cannot be parsed.

#[cfg(feature = "api")]
pub mod client;
pub mod synthetic;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{ForecastError, ForecastResult};
use crate::slots::ForecastBucket;

#[cfg(feature = "api")]
pub use client::CarbonIntensityClient;
pub use synthetic::SyntheticForecast;

/// Public endpoint of the GB carbon-intensity service.
pub const DEFAULT_BASE_URL: &str = "https://api.carbonintensity.org.uk";

/// Minute-resolution UTC layout used by the carbon-intensity service.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// One forecast period as published by the carbon-intensity service.
///
/// A missing or `null` timestamp decodes as an empty string so the record
/// is dropped by [`parse_records`] instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Period start, e.g. `"2024-03-01T09:00Z"`.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub from: String,
    /// Period end.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub to: String,
    /// Forecast and (once known) actual intensity.
    pub intensity: IntensityReading,
}

/// Intensity values attached to a [`ForecastRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityReading {
    /// Forecast intensity (gCO2/kWh).
    pub forecast: i32,
    /// Measured intensity, absent for future periods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<i32>,
    /// Qualitative band such as `"low"` or `"high"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope of the service's forecast response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub data: Vec<ForecastRecord>,
}

impl ForecastRecord {
    /// Parses both timestamps into a bucket.
    ///
    /// The bucket is not checked for `to > from`; the selector filters those.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Timestamp`] naming the first field that fails
    /// to parse.
    pub fn to_bucket(&self) -> ForecastResult<ForecastBucket> {
        let from = parse_timestamp(&self.from).ok_or_else(|| ForecastError::Timestamp {
            field: "from",
            value: self.from.clone(),
        })?;
        let to = parse_timestamp(&self.to).ok_or_else(|| ForecastError::Timestamp {
            field: "to",
            value: self.to.clone(),
        })?;
        Ok(ForecastBucket::new(from, to, self.intensity.forecast))
    }
}

/// Buckets parsed from a batch of records.
#[derive(Debug, Clone, Default)]
pub struct ParsedForecast {
    /// Successfully parsed buckets, in input order.
    pub buckets: Vec<ForecastBucket>,
    /// Number of records dropped for unparsable timestamps.
    pub skipped: usize,
}

/// Parses records into buckets, skipping (and logging) unparsable ones.
pub fn parse_records(records: &[ForecastRecord]) -> ParsedForecast {
    let mut parsed = ParsedForecast {
        buckets: Vec::with_capacity(records.len()),
        skipped: 0,
    };
    for record in records {
        match record.to_bucket() {
            Ok(bucket) => parsed.buckets.push(bucket),
            Err(e) => {
                warn!(error = %e, "skipping forecast record");
                parsed.skipped += 1;
            }
        }
    }
    parsed
}

/// Parses the service layout, falling back to RFC 3339.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
        .ok()
}

/// Formats a timestamp in the service layout.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Forecast data that is available without network access.
#[derive(Debug, Clone)]
pub enum LocalForecast {
    /// Records loaded up front, e.g. from a JSON file.
    Static(Vec<ForecastRecord>),
    /// Seeded synthetic forecast.
    Synthetic(SyntheticForecast),
}

impl LocalForecast {
    /// Returns the forecast records.
    pub fn records(&self) -> Vec<ForecastRecord> {
        match self {
            Self::Static(records) => records.clone(),
            Self::Synthetic(forecast) => forecast.generate(),
        }
    }
}

/// Where forecast data comes from when serving requests.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub enum ForecastProvider {
    /// Live forecast from the carbon-intensity service.
    Remote(CarbonIntensityClient),
    /// Static or synthetic forecast.
    Local(LocalForecast),
}

#[cfg(feature = "api")]
impl ForecastProvider {
    /// Fetches the current forecast records.
    ///
    /// # Errors
    ///
    /// Returns a [`ForecastError`] if the remote request fails.
    pub async fn fetch(&self) -> ForecastResult<Vec<ForecastRecord>> {
        match self {
            Self::Remote(client) => client.fetch_forecast(Utc::now()).await,
            Self::Local(local) => Ok(local.records()),
        }
    }
}
