use std::time::Duration;

use anyhow::{Context, Result};
use cepweather_core::{listen_addr, InputConfig, ServiceConfig};
use cepweather_input::{router, InputState, ResolutionClient};
use cepweather_weather::http_client;

#[tokio::main]
async fn main() -> Result<()> {
    cepweather_core::init("cepweather-input")?;

    let config = InputConfig::load_validated()
        .inspect_err(|e| tracing::error!("{}", e.user_message()))
        .context("Failed to load configuration")?;

    let client = http_client(Duration::from_secs(config.request_timeout_secs))
        .context("Failed to create HTTP client")?;
    let resolver = ResolutionClient::new(client, &config.service_b_url)
        .context("Failed to configure resolution service client")?;

    let addr = listen_addr(&config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        "Starting server on {}, forwarding to {}",
        addr,
        config.service_b_url
    );

    axum::serve(listener, router(InputState::new(resolver)))
        .with_graceful_shutdown(cepweather_core::shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped gracefully");
    Ok(())
}
