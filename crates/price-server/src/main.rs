//! Price Server - used-car resale price estimation service
//!
//! Loads the model artifact once at startup and serves predictions,
//! selection choices and feature importances over HTTP.

use anyhow::{Context, Result};
use price_server::{api, config::ServerConfig};
use pricing_lib::{
    health::{components, HealthRegistry},
    observability::{PricingMetrics, StructuredLogger},
    process_artifact, InputPolicy, Predictor,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting price-server");

    let config = ServerConfig::load()?;
    info!(
        artifact = %config.artifact_path.display(),
        port = config.api_port,
        strict_inputs = config.strict_inputs,
        "Server configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::ARTIFACT).await;
    health_registry.register(components::PREDICTOR).await;

    let metrics = PricingMetrics::new();
    let logger = StructuredLogger::new(&config.service_name);

    // Load the artifact once; a missing or corrupt artifact aborts startup
    let artifact_path = config.artifact_path.clone();
    let start = Instant::now();
    let loaded = tokio::task::spawn_blocking(move || process_artifact(&artifact_path))
        .await
        .context("Artifact loader task panicked")?;
    health_registry.record_artifact_load(&loaded).await;

    let artifact = match loaded {
        Ok(artifact) => artifact,
        Err(err) => {
            logger.log_artifact_failed(
                &config.artifact_path.display().to_string(),
                err.kind(),
                &err.to_string(),
            );
            return Err(err).context("Failed to load model artifact");
        }
    };

    let elapsed = start.elapsed();
    metrics.set_artifact_load_time(elapsed.as_secs_f64());
    metrics.set_model_info(artifact.regressor().algorithm(), artifact.checksum());
    logger.log_artifact_loaded(
        &config.artifact_path.display().to_string(),
        artifact.regressor().algorithm(),
        artifact.checksum(),
        elapsed.as_millis(),
    );
    logger.log_startup(SERVER_VERSION, artifact.regressor().algorithm());

    let predictor = Predictor::new(artifact);
    let mut state = api::AppState::new(predictor, health_registry, metrics, logger.clone());
    if config.strict_inputs {
        state = state.with_input_policy(InputPolicy::default());
    }

    tokio::select! {
        result = api::serve(config.api_port, Arc::new(state)) => {
            result.context("API server failed")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            logger.log_shutdown("SIGINT received");
            info!("Shutting down");
        }
    }

    Ok(())
}
