use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::types::{Location, WeatherError};

const USER_AGENT: &str = concat!("cepweather/", env!("CARGO_PKG_VERSION"));

/// Resolves a normalized CEP into a place.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Returns `WeatherError::NotFound` when the upstream has no such CEP.
    async fn lookup(&self, cep: &str, token: &CancellationToken) -> Result<Location, WeatherError>;
}

/// Retrieves the current temperature in Celsius for a place.
#[async_trait]
pub trait TemperatureProvider: Send + Sync {
    /// Returns `WeatherError::NotFound` when the upstream cannot match the place.
    async fn current_celsius(
        &self,
        location: &Location,
        token: &CancellationToken,
    ) -> Result<f64, WeatherError>;
}

/// Build the HTTP client shared by every provider in the process.
pub fn http_client(timeout: Duration) -> Result<Arc<Client>, WeatherError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;

    Ok(Arc::new(client))
}

/// Race an upstream call against the cancellation token.
pub(crate) async fn cancellable<T, F>(token: &CancellationToken, call: F) -> Result<T, WeatherError>
where
    F: Future<Output = Result<T, WeatherError>>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => Err(WeatherError::Cancelled),
        result = call => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancellable_passes_result_through() {
        let token = CancellationToken::new();
        let result = cancellable(&token, async { Ok::<_, WeatherError>(21.5) }).await;
        assert_eq!(result.unwrap(), 21.5);
    }

    #[tokio::test]
    async fn test_cancellable_returns_promptly_when_cancelled() {
        let token = CancellationToken::new();
        token.cancel();

        let result: Result<f64, _> = cancellable(&token, std::future::pending()).await;
        assert!(matches!(result, Err(WeatherError::Cancelled)));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client(Duration::from_secs(5)).is_ok());
    }
}
