//! Server configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Path to the JSON model artifact
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,

    /// HTTP port for prediction, health and metrics endpoints
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Service name attached to structured log events
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Reject requests outside the form's input bounds with 422
    #[serde(default)]
    pub strict_inputs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
            api_port: default_api_port(),
            service_name: default_service_name(),
            strict_inputs: false,
        }
    }
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("car_price_model.json")
}

fn default_api_port() -> u16 {
    8080
}

fn default_service_name() -> String {
    "price-server".to_string()
}

impl ServerConfig {
    /// Load configuration from an optional `pricer.toml` and `PRICER_*`
    /// environment variables (environment wins)
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("pricer").required(false))
            .add_source(config::Environment::with_prefix("PRICER"))
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }
}
