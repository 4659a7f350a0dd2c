use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use cepweather_core::http::with_service_routes;
use cepweather_weather::{cep, WeatherError};
use serde::Deserialize;

use crate::error::InputError;
use crate::forward::ResolutionClient;

/// `{"cep": "..."}`; a missing `cep` reads as empty and fails validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CepRequest {
    #[serde(default)]
    pub cep: String,
}

#[derive(Debug, Clone)]
pub struct InputState {
    resolver: Arc<ResolutionClient>,
}

impl InputState {
    pub fn new(resolver: ResolutionClient) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

/// HTTP routes of the intake service
pub fn router(state: InputState) -> Router {
    let routes = Router::new().route("/", post(submit_cep));

    with_service_routes(routes).with_state(state)
}

async fn submit_cep(State(state): State<InputState>, body: Bytes) -> Result<Response, InputError> {
    let request: CepRequest = serde_json::from_slice(&body)?;
    // Exact shape only: padded input is rejected here, not trimmed.
    if !cep::is_valid(&request.cep) {
        return Err(WeatherError::InvalidCep.into());
    }

    let forwarded = state.resolver.forward(&request.cep).await?;

    Ok((
        forwarded.status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        forwarded.body,
    )
        .into_response())
}
