//! Domain values and the resolution error taxonomy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Place resolved from a CEP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub region: String,
}

impl Location {
    pub fn new(city: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            region: region.into(),
        }
    }

    /// Query string sent to the weather provider: `"<city>"` or `"<city>, <region>"`.
    pub fn query(&self) -> String {
        if self.region.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.region)
        }
    }
}

/// Current temperature in three units, each rounded to one decimal place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperatures {
    #[serde(rename = "temp_C")]
    pub celsius: f64,
    #[serde(rename = "temp_F")]
    pub fahrenheit: f64,
    #[serde(rename = "temp_K")]
    pub kelvin: f64,
}

impl Temperatures {
    /// Convert a Celsius reading. Each unit is rounded independently.
    pub fn from_celsius(celsius: f64) -> Self {
        let fahrenheit = celsius * 1.8 + 32.0;
        let kelvin = celsius + 273.0;

        Self {
            celsius: round_to_single_decimal(celsius),
            fahrenheit: round_to_single_decimal(fahrenheit),
            kelvin: round_to_single_decimal(kelvin),
        }
    }
}

/// Round half away from zero to one decimal place
fn round_to_single_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Coarse error classification exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identifier is not exactly 8 digits
    InvalidFormat,
    /// An upstream provider reported no match
    NotFound,
    /// Anything else: network, unexpected status, bad payload, cancellation
    Transport,
}

impl ErrorKind {
    /// Fixed message returned to external callers
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid zipcode",
            Self::NotFound => "can not find zipcode",
            Self::Transport => "internal server error",
        }
    }
}

/// Resolution errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("invalid zipcode")]
    InvalidCep,
    #[error("can not find zipcode")]
    NotFound,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{provider}: unexpected status {status}")]
    UnexpectedStatus { provider: &'static str, status: u16 },
    #[error("{provider}: {message} (status {status})")]
    Upstream {
        provider: &'static str,
        status: u16,
        message: String,
    },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCep => ErrorKind::InvalidFormat,
            Self::NotFound => ErrorKind::NotFound,
            Self::Network(_)
            | Self::UnexpectedStatus { .. }
            | Self::Upstream { .. }
            | Self::Parse(_)
            | Self::Cancelled
            | Self::Timeout(_) => ErrorKind::Transport,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}
