//! CEP to current temperature resolution.
//!
//! Looks a CEP up through ViaCEP, fetches the current Celsius reading for the
//! resulting city from WeatherAPI, and converts it to Fahrenheit and Kelvin.

pub mod cep;
pub mod provider;
pub mod service;
pub mod types;
pub mod viacep;
pub mod weatherapi;

pub use provider::{http_client, LocationProvider, TemperatureProvider};
pub use service::WeatherService;
pub use types::*;
pub use viacep::ViaCepClient;
pub use weatherapi::WeatherApiClient;

pub use tokio_util::sync::CancellationToken;
