pub mod config;
pub mod error;
pub mod http;

pub use config::{
    Config, CropConfig, DeviceCoordinates, FallbackLocation, LocationConfig, NewsConfig, RefreshConfig,
    ServiceConfig, ValidationResult,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("AgriFeed core initialized");
    Ok(())
}
