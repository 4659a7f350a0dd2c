use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use cepweather_core::http::with_service_routes;
use cepweather_weather::{CancellationToken, Temperatures, WeatherService};

use crate::error::ApiError;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    service: WeatherService,
    deadline: Duration,
    shutdown: CancellationToken,
}

impl AppState {
    /// `deadline` bounds each resolution; cancelling `shutdown` aborts every
    /// resolution still in flight.
    pub fn new(service: WeatherService, deadline: Duration, shutdown: CancellationToken) -> Self {
        Self {
            service,
            deadline,
            shutdown,
        }
    }
}

/// HTTP routes of the resolution service
pub fn router(state: AppState) -> Router {
    let routes = Router::new().route("/weather/{cep}", get(get_weather));

    with_service_routes(routes).with_state(state)
}

async fn get_weather(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<Temperatures>, ApiError> {
    let temperatures = state
        .service
        .resolve_within(&cep, state.deadline, &state.shutdown)
        .await?;

    Ok(Json(temperatures))
}
