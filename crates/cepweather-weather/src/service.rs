//! Resolution pipeline: CEP -> place -> Celsius -> three-unit reading.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::cep;
use crate::provider::{LocationProvider, TemperatureProvider};
use crate::types::{Temperatures, WeatherError};

/// Orchestrates location lookup and temperature retrieval.
///
/// Cheap to clone; the providers are shared.
#[derive(Clone)]
pub struct WeatherService {
    locations: Arc<dyn LocationProvider>,
    temperatures: Arc<dyn TemperatureProvider>,
}

impl WeatherService {
    pub fn new(
        locations: Arc<dyn LocationProvider>,
        temperatures: Arc<dyn TemperatureProvider>,
    ) -> Self {
        Self {
            locations,
            temperatures,
        }
    }

    /// Resolve a raw CEP to the current temperature.
    ///
    /// Steps run strictly in order and the first failure is returned as-is:
    /// an invalid CEP never reaches the network, and a location miss never
    /// reaches the weather provider.
    #[instrument(skip(self, token), level = "info")]
    pub async fn resolve(
        &self,
        raw_cep: &str,
        token: &CancellationToken,
    ) -> Result<Temperatures, WeatherError> {
        let cep = cep::normalize(raw_cep)?;

        let location = self.locations.lookup(cep, token).await?;
        tracing::debug!("CEP {} is {}", cep, location.query());

        let celsius = self.temperatures.current_celsius(&location, token).await?;

        Ok(Temperatures::from_celsius(celsius))
    }

    /// `resolve` bounded by a deadline.
    ///
    /// The resolution runs on a child of `parent`; when the deadline passes
    /// first, the child is cancelled and `WeatherError::Timeout` is returned.
    pub async fn resolve_within(
        &self,
        raw_cep: &str,
        deadline: Duration,
        parent: &CancellationToken,
    ) -> Result<Temperatures, WeatherError> {
        let token = parent.child_token();

        tokio::select! {
            result = self.resolve(raw_cep, &token) => result,
            () = tokio::time::sleep(deadline) => {
                token.cancel();
                tracing::warn!("Resolution of {:?} exceeded {:?}", raw_cep, deadline);
                Err(WeatherError::Timeout(deadline))
            }
        }
    }
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService").finish_non_exhaustive()
    }
}
