//! Maps resolution errors onto HTTP status codes and fixed messages.
//! Internal detail is logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cepweather_core::http::message_response;
use cepweather_weather::{ErrorKind, WeatherError};

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidFormat => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Transport => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Handler error wrapper so `WeatherError` can be returned with `?`
#[derive(Debug)]
pub struct ApiError(pub WeatherError);

impl From<WeatherError> for ApiError {
    fn from(e: WeatherError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        match kind {
            ErrorKind::Transport => tracing::error!(error = %self.0, "Unexpected error resolving CEP"),
            _ => tracing::debug!(error = %self.0, "Resolution rejected"),
        }

        message_response(status_for(kind), kind.user_message())
    }
}
