//! Client for the resolution service.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::Client;
use thiserror::Error;
use tracing::instrument;
use url::Url;

#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("Invalid resolution service URL: {0}")]
    InvalidUrl(String),

    #[error("Resolution service request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Status and raw body of a resolution service answer
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Forwards validated CEPs to `GET {base}/weather/{cep}`
#[derive(Debug, Clone)]
pub struct ResolutionClient {
    client: Arc<Client>,
    base_url: Url,
}

impl ResolutionClient {
    pub fn new(client: Arc<Client>, base_url: &str) -> Result<Self, ForwardError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ForwardError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ForwardError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    pub fn weather_url(&self, cep: &str) -> Result<Url, ForwardError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ForwardError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("weather")
            .push(cep);
        Ok(url)
    }

    /// Any HTTP answer is a success here, whatever its status.
    #[instrument(skip(self))]
    pub async fn forward(&self, cep: &str) -> Result<Forwarded, ForwardError> {
        let url = self.weather_url(cep)?;
        tracing::debug!("Forwarding to {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok(Forwarded { status, body })
    }
}
