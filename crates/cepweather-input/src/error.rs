//! Rejections produced by the intake service itself.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cepweather_core::http::message_response;
use cepweather_weather::WeatherError;
use thiserror::Error;

use crate::forward::ForwardError;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Undecodable request body: {0}")]
    Body(#[from] serde_json::Error),

    #[error(transparent)]
    Cep(#[from] WeatherError),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl InputError {
    pub fn status(&self) -> StatusCode {
        match self {
            InputError::Body(_) => StatusCode::BAD_REQUEST,
            InputError::Cep(_) => StatusCode::UNPROCESSABLE_ENTITY,
            InputError::Forward(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            InputError::Body(_) => "invalid request body",
            InputError::Cep(e) => e.user_message(),
            InputError::Forward(_) => "internal server error",
        }
    }
}

impl IntoResponse for InputError {
    fn into_response(self) -> Response {
        match &self {
            InputError::Forward(e) => tracing::error!(error = %e, "Error forwarding to resolution service"),
            _ => tracing::debug!(error = %self, "Request rejected"),
        }

        message_response(self.status(), self.user_message())
    }
}
