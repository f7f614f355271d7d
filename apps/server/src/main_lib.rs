use std::sync::Arc;

use crate::config::{Config, LogFormat};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use volcast_core::analysis::{VolatilityService, VolatilityServiceTrait};
use volcast_market_data::{AlphaVantageProvider, PriceSeriesProvider, ProviderConfig};

pub struct AppState {
    pub volatility_service: Arc<dyn VolatilityServiceTrait>,
}

impl AppState {
    pub fn new(volatility_service: Arc<dyn VolatilityServiceTrait>) -> Arc<Self> {
        Arc::new(Self { volatility_service })
    }

    /// State backed by an arbitrary price source.
    pub fn with_provider(provider: Arc<dyn PriceSeriesProvider>) -> Arc<Self> {
        Self::new(Arc::new(VolatilityService::new(provider)))
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = AlphaVantageProvider::with_config(
        config.alpha_api_key.clone(),
        ProviderConfig {
            base_url: config.alpha_vantage_url.clone(),
            timeout: config.upstream_timeout,
        },
    )?;
    tracing::info!(
        "Using Alpha Vantage at {} (timeout {:?})",
        config.alpha_vantage_url,
        config.upstream_timeout
    );

    Ok(AppState::with_provider(Arc::new(provider)))
}
