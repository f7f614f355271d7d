//! Out-of-sample evaluation: refit before every test date and forecast one
//! step ahead.

use log::debug;
use rayon::prelude::*;

use super::forecaster::VolatilityForecaster;
use super::volatility_model::WalkForwardPoint;
use super::volatility_traits::{FittedModel, VolatilityModel};
use crate::errors::{Error, ModelFitError, Result};
use crate::returns::ReturnSeries;

/// Forecast each of the last `test_size` dates from the returns strictly
/// before it.
///
/// Fits are independent and run on the rayon pool; output is in date order.
pub fn walk_forward<M: VolatilityModel>(
    forecaster: &VolatilityForecaster<M>,
    returns: &ReturnSeries,
    test_size: usize,
) -> Result<Vec<WalkForwardPoint>> {
    let n = returns.len();
    if test_size > n {
        return Err(Error::MalformedInput(format!(
            "test size {} exceeds series length {}",
            test_size, n
        )));
    }

    let points = returns.points();
    let first_test = n - test_size;
    debug!(
        "Walk-forward over {} dates with {} initial training returns",
        test_size, first_test
    );

    (first_test..n)
        .into_par_iter()
        .map(|i| -> Result<WalkForwardPoint> {
            let fitted = forecaster.fit(&returns.head(i))?;
            let variance = fitted
                .forecast_variance(1)
                .first()
                .copied()
                .ok_or_else(|| {
                    ModelFitError::NumericalError("model produced no forecast".to_string())
                })?;
            if !variance.is_finite() {
                return Err(ModelFitError::NumericalError(format!(
                    "forecast variance {} is not finite",
                    variance
                ))
                .into());
            }

            Ok(WalkForwardPoint {
                date: points[i].date,
                realized_return: points[i].value,
                forecast_volatility: variance.max(0.0).sqrt(),
            })
        })
        .collect()
}

/// [`walk_forward`] over the trailing `floor(test_fraction * n)` dates.
pub fn walk_forward_fraction<M: VolatilityModel>(
    forecaster: &VolatilityForecaster<M>,
    returns: &ReturnSeries,
    test_fraction: f64,
) -> Result<Vec<WalkForwardPoint>> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::MalformedInput(format!(
            "test fraction must be within (0, 1), got {}",
            test_fraction
        )));
    }
    let test_size = (test_fraction * returns.len() as f64).floor() as usize;
    walk_forward(forecaster, returns, test_size)
}
