//! Volatility service.
//!
//! Wires a [`PriceSeriesProvider`] to the returns extractor and the GARCH
//! forecaster. Model fitting is CPU-bound and runs on the blocking pool so
//! async callers are never stalled by it.

use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use volcast_market_data::{OutputSize, PriceSeriesProvider, PriceTable};

use super::analysis_model::{unit_label, AnalysisRequest, VolatilityReport};
use crate::constants::REPORT_PRICE_PREVIEW_ROWS;
use crate::errors::{Error, Result};
use crate::returns::{self, ReturnSeries};
use crate::volatility::{
    walk_forward_fraction, ForecastMapping, GarchModel, VolatilityForecaster, WalkForwardPoint,
};

/// Fetch, returns and forecast operations.
#[async_trait]
pub trait VolatilityServiceTrait: Send + Sync {
    /// Daily prices for `ticker`, newest first.
    async fn fetch_prices(
        &self,
        ticker: &str,
        output_size: OutputSize,
        row_limit: Option<usize>,
    ) -> Result<PriceTable>;

    /// Percentage returns of `close`, keeping the most recent `limit`.
    fn extract_returns(&self, table: &PriceTable, limit: usize) -> Result<ReturnSeries>;

    /// Daily volatility for `horizon_days` business days after the series.
    async fn forecast_volatility(
        &self,
        returns: ReturnSeries,
        horizon_days: usize,
    ) -> Result<ForecastMapping>;

    /// One-step-ahead forecasts over the trailing `test_fraction` of the series.
    async fn walk_forward(
        &self,
        returns: ReturnSeries,
        test_fraction: f64,
    ) -> Result<Vec<WalkForwardPoint>>;

    /// Fetch, extract and forecast in one call.
    async fn analyze(&self, request: AnalysisRequest) -> Result<VolatilityReport>;
}

pub struct VolatilityService {
    provider: Arc<dyn PriceSeriesProvider>,
    forecaster: Arc<VolatilityForecaster<GarchModel>>,
}

impl VolatilityService {
    pub fn new(provider: Arc<dyn PriceSeriesProvider>) -> Self {
        Self::with_forecaster(provider, VolatilityForecaster::new(GarchModel::default()))
    }

    pub fn with_forecaster(
        provider: Arc<dyn PriceSeriesProvider>,
        forecaster: VolatilityForecaster<GarchModel>,
    ) -> Self {
        Self {
            provider,
            forecaster: Arc::new(forecaster),
        }
    }

    async fn run_blocking<T, F>(&self, task: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&VolatilityForecaster<GarchModel>) -> Result<T> + Send + 'static,
    {
        let forecaster = Arc::clone(&self.forecaster);
        tokio::task::spawn_blocking(move || task(forecaster.as_ref()))
            .await
            .map_err(|e| Error::Unexpected(format!("model task failed: {}", e)))?
    }
}

#[async_trait]
impl VolatilityServiceTrait for VolatilityService {
    async fn fetch_prices(
        &self,
        ticker: &str,
        output_size: OutputSize,
        row_limit: Option<usize>,
    ) -> Result<PriceTable> {
        debug!(
            "Fetching {} prices for {} from {}",
            output_size,
            ticker,
            self.provider.id()
        );
        let table = self
            .provider
            .fetch_daily(ticker, output_size, row_limit)
            .await?;
        info!("Fetched {} price rows for {}", table.len(), ticker);
        Ok(table)
    }

    fn extract_returns(&self, table: &PriceTable, limit: usize) -> Result<ReturnSeries> {
        returns::extract_returns(table, limit)
    }

    async fn forecast_volatility(
        &self,
        returns: ReturnSeries,
        horizon_days: usize,
    ) -> Result<ForecastMapping> {
        self.run_blocking(move |forecaster| forecaster.forecast(&returns, horizon_days))
            .await
    }

    async fn walk_forward(
        &self,
        returns: ReturnSeries,
        test_fraction: f64,
    ) -> Result<Vec<WalkForwardPoint>> {
        self.run_blocking(move |forecaster| {
            walk_forward_fraction(forecaster, &returns, test_fraction)
        })
        .await
    }

    async fn analyze(&self, request: AnalysisRequest) -> Result<VolatilityReport> {
        let table = self
            .fetch_prices(&request.ticker, request.output_size, request.row_limit)
            .await?;
        let series = self.extract_returns(&table, request.returns_limit)?;

        // Fit first so short histories surface as InsufficientData.
        let horizon_days = request.horizon_days;
        let (summary, forecast, return_stats) = self
            .run_blocking(move |forecaster| {
                let (fit, mapping) = forecaster.forecast_with_fit(&series, horizon_days)?;
                Ok((fit.summary(), mapping, series.stats()?))
            })
            .await?;

        let forecast = if request.annualized {
            forecast.annualized()
        } else {
            forecast
        };

        Ok(VolatilityReport {
            latest_prices: table.head(REPORT_PRICE_PREVIEW_ROWS).rows().to_vec(),
            price_rows: table.len(),
            return_stats,
            model: summary,
            annualized: request.annualized,
            unit_label: unit_label(request.annualized).to_string(),
            forecast,
            ticker: request.ticker,
        })
    }
}
