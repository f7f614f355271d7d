use log::debug;

use super::garch::GarchModel;
use super::volatility_model::ForecastMapping;
use super::volatility_traits::{FittedModel, VolatilityModel};
use crate::errors::{ModelFitError, Result};
use crate::returns::ReturnSeries;
use crate::utils::time_utils::business_days_after;

/// Fits a [`VolatilityModel`] and lays its volatility forecast onto business
/// dates following the last observation.
///
/// Holds no state between calls; every forecast fits a fresh model.
#[derive(Debug, Clone, Default)]
pub struct VolatilityForecaster<M = GarchModel> {
    model: M,
}

impl<M: VolatilityModel> VolatilityForecaster<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn fit(&self, returns: &ReturnSeries) -> Result<M::Fitted> {
        Ok(self.model.fit(returns)?)
    }

    /// Volatility (standard deviation, in return units) for `horizon_days`
    /// business days after the last return date.
    pub fn forecast(&self, returns: &ReturnSeries, horizon_days: usize) -> Result<ForecastMapping> {
        self.forecast_with_fit(returns, horizon_days)
            .map(|(_, mapping)| mapping)
    }

    /// Like [`forecast`](Self::forecast), also returning the fitted model.
    pub fn forecast_with_fit(
        &self,
        returns: &ReturnSeries,
        horizon_days: usize,
    ) -> Result<(M::Fitted, ForecastMapping)> {
        let fitted = self.fit(returns)?;
        let last_date = returns.last_date().ok_or(ModelFitError::InsufficientData {
            found: 0,
            required: 1,
        })?;

        let variances = fitted.forecast_variance(horizon_days);
        if variances.len() != horizon_days {
            return Err(ModelFitError::NumericalError(format!(
                "{} returned {} variances for a horizon of {}",
                self.model.name(),
                variances.len(),
                horizon_days
            ))
            .into());
        }
        if let Some(bad) = variances.iter().find(|v| !v.is_finite()) {
            return Err(ModelFitError::NumericalError(format!(
                "forecast variance {} is not finite",
                bad
            ))
            .into());
        }

        let dates = business_days_after(last_date, horizon_days);
        let entries = dates
            .into_iter()
            .zip(variances)
            .map(|(date, variance)| (date, variance.max(0.0).sqrt()))
            .collect();

        debug!(
            "{} forecast of {} business days after {}",
            self.model.name(),
            horizon_days,
            last_date
        );

        Ok((fitted, ForecastMapping::from_entries(entries)))
    }
}
