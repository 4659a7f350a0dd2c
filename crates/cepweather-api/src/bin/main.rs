use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cepweather_api::{router, AppState};
use cepweather_core::{listen_addr, ApiConfig, ServiceConfig};
use cepweather_weather::{
    http_client, CancellationToken, ViaCepClient, WeatherApiClient, WeatherService,
};

#[tokio::main]
async fn main() -> Result<()> {
    cepweather_core::init("cepweather-api")?;

    let config = ApiConfig::load_validated()
        .inspect_err(|e| tracing::error!("{}", e.user_message()))
        .context("Failed to load configuration")?;

    let client = http_client(Duration::from_secs(config.request_timeout_secs))
        .context("Failed to create HTTP client")?;
    let locations = Arc::new(ViaCepClient::new(client.clone(), &config.viacep_base_url));
    let temperatures = Arc::new(WeatherApiClient::new(
        client,
        &config.weather_api_base_url,
        &config.weather_api_key,
    ));
    let service = WeatherService::new(locations, temperatures);

    let shutdown = CancellationToken::new();
    let state = AppState::new(
        service,
        Duration::from_secs(config.resolve_deadline_secs),
        shutdown.clone(),
    );

    let addr = listen_addr(&config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Starting server on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            cepweather_core::shutdown_signal().await;
            shutdown.cancel();
        })
        .await
        .context("Server error")?;

    tracing::info!("Server stopped gracefully");
    Ok(())
}
