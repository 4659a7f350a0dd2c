//! CEP lookup via ViaCEP (https://viacep.com.br) - free, no API key required.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::provider::{cancellable, LocationProvider};
use crate::types::{Location, WeatherError};

const PROVIDER: &str = "viacep";

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: Option<ErrorFlag>,
}

/// ViaCEP reports unknown CEPs with `"erro": true` or `"erro": "true"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorFlag {
    Bool(bool),
    Text(String),
    #[allow(dead_code)]
    Other(serde_json::Value),
}

impl ErrorFlag {
    fn is_set(&self) -> bool {
        match self {
            Self::Bool(flag) => *flag,
            Self::Text(text) => text == "true",
            Self::Other(_) => false,
        }
    }
}

/// `LocationProvider` backed by the ViaCEP REST API
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Arc<Client>,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(client: Arc<Client>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn lookup_url(&self, cep: &str) -> String {
        format!("{}/{}/json/", self.base_url, cep)
    }

    async fn fetch(&self, cep: &str) -> Result<Location, WeatherError> {
        let response = self.client.get(self.lookup_url(cep)).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("ViaCEP returned status {}", status);
            return Err(WeatherError::UnexpectedStatus {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let payload: ViaCepResponse = serde_json::from_slice(&body)
            .map_err(|e| WeatherError::Parse(format!("{}: {}", PROVIDER, e)))?;

        parse_location(payload)
    }
}

fn parse_location(payload: ViaCepResponse) -> Result<Location, WeatherError> {
    let missing = payload.erro.as_ref().is_some_and(ErrorFlag::is_set);
    if missing || payload.localidade.is_empty() {
        return Err(WeatherError::NotFound);
    }

    Ok(Location::new(payload.localidade, payload.uf))
}

#[async_trait]
impl LocationProvider for ViaCepClient {
    #[instrument(skip(self, token), level = "info")]
    async fn lookup(&self, cep: &str, token: &CancellationToken) -> Result<Location, WeatherError> {
        let location = cancellable(token, self.fetch(cep)).await?;
        tracing::info!("Resolved {} to {}", cep, location.query());
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Location, WeatherError> {
        parse_location(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_lookup_url_trims_trailing_slash() {
        let client = ViaCepClient::new(Arc::new(Client::new()), "https://example.com/ws/");
        assert_eq!(client.lookup_url("12345678"), "https://example.com/ws/12345678/json/");
    }

    #[test]
    fn test_parses_location() {
        let location = parse(r#"{"cep":"01310-100","localidade":"São Paulo","uf":"SP"}"#).unwrap();
        assert_eq!(location, Location::new("São Paulo", "SP"));
    }

    #[test]
    fn test_error_flag_bool() {
        assert!(matches!(parse(r#"{"erro": true}"#), Err(WeatherError::NotFound)));
    }

    #[test]
    fn test_error_flag_string() {
        assert!(matches!(parse(r#"{"erro": "true"}"#), Err(WeatherError::NotFound)));
    }

    #[test]
    fn test_false_error_flags_are_ignored() {
        let location = parse(r#"{"localidade":"Recife","uf":"PE","erro":false}"#).unwrap();
        assert_eq!(location.city, "Recife");

        let location = parse(r#"{"localidade":"Recife","uf":"PE","erro":"false"}"#).unwrap();
        assert_eq!(location.city, "Recife");

        let location = parse(r#"{"localidade":"Recife","uf":"PE","erro":null}"#).unwrap();
        assert_eq!(location.region, "PE");
    }

    #[test]
    fn test_empty_city_is_not_found() {
        assert!(matches!(
            parse(r#"{"localidade":"","uf":"SP"}"#),
            Err(WeatherError::NotFound)
        ));
    }

    #[test]
    fn test_missing_region_is_allowed() {
        let location = parse(r#"{"localidade":"Brasília"}"#).unwrap();
        assert_eq!(location.query(), "Brasília");
    }
}
