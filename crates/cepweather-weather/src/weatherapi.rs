//! Current conditions via WeatherAPI (https://www.weatherapi.com).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::provider::{cancellable, TemperatureProvider};
use crate::types::{Location, WeatherError};

const PROVIDER: &str = "weatherapi";

/// Lowercased phrase WeatherAPI uses for an unknown `q`.
///
/// Matching on wording is fragile, but it is the only signal the API gives.
const NO_MATCH_PHRASE: &str = "no matching location found";

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp_c: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// `TemperatureProvider` backed by the WeatherAPI `current.json` endpoint
#[derive(Clone)]
pub struct WeatherApiClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(client: Arc<Client>, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn fetch(&self, query: &str) -> Result<f64, WeatherError> {
        let url = format!("{}/current.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await
            .map_err(redact)?;

        let status = response.status();
        let body = response.bytes().await.map_err(redact)?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        let payload: CurrentResponse = serde_json::from_slice(&body)
            .map_err(|e| WeatherError::Parse(format!("{}: {}", PROVIDER, e)))?;

        Ok(payload.current.temp_c)
    }
}

/// The request URL carries the API key as a query parameter; keep it out of errors.
fn redact(err: reqwest::Error) -> WeatherError {
    WeatherError::Network(err.without_url())
}

/// Map a non-success response onto the error taxonomy.
fn classify_error(status: StatusCode, body: &[u8]) -> WeatherError {
    let payload: ErrorResponse = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(_) => {
            return WeatherError::UnexpectedStatus {
                provider: PROVIDER,
                status: status.as_u16(),
            }
        }
    };

    let message = payload.error.message;
    if status.is_client_error() && message.to_lowercase().contains(NO_MATCH_PHRASE) {
        return WeatherError::NotFound;
    }

    WeatherError::Upstream {
        provider: PROVIDER,
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl TemperatureProvider for WeatherApiClient {
    #[instrument(skip(self, token), fields(city = %location.city, region = %location.region), level = "info")]
    async fn current_celsius(
        &self,
        location: &Location,
        token: &CancellationToken,
    ) -> Result<f64, WeatherError> {
        let query = location.query();
        let celsius = cancellable(token, self.fetch(&query)).await?;
        tracing::info!("Current temperature in {} is {} C", query, celsius);
        Ok(celsius)
    }
}

impl std::fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
