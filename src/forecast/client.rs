//! Client for the GB carbon-intensity forecast API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, warn};

use super::{ForecastRecord, ForecastResponse, format_timestamp};
use crate::config::ForecastConfig;
use crate::error::{ForecastError, ForecastResult};

impl From<reqwest::Error> for ForecastError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(Box::new(e))
    }
}

/// Fetches 24 hour forward forecasts over HTTP.
#[derive(Debug, Clone)]
pub struct CarbonIntensityClient {
    client: Client,
    base_url: String,
}

impl CarbonIntensityClient {
    /// Builds a client from the `[forecast]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &ForecastConfig) -> ForecastResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the forward-24h forecast starting at `from`.
    pub fn forecast_url(&self, from: DateTime<Utc>) -> String {
        format!(
            "{}/intensity/{}/fw24h",
            self.base_url,
            format_timestamp(&from)
        )
    }

    /// Fetches the forecast for the 24 hours following `from`.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Http`] on transport or decode failure and
    /// [`ForecastError::Status`] on a non-success response.
    pub async fn fetch_forecast(&self, from: DateTime<Utc>) -> ForecastResult<Vec<ForecastRecord>> {
        let url = self.forecast_url(from);
        debug!(%url, "fetching carbon-intensity forecast");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "forecast request rejected");
            return Err(ForecastError::Status(status.as_u16()));
        }

        let body: ForecastResponse = resp.json().await?;
        debug!(records = body.data.len(), "received forecast");
        Ok(body.data)
    }
}
