//! Volatility module - conditional-volatility estimation and forecasting.

mod forecaster;
mod garch;
pub mod optimizer;
mod volatility_model;
mod volatility_traits;
mod walk_forward;

pub use forecaster::VolatilityForecaster;
pub use garch::{GarchFit, GarchModel, GarchParams, GarchSummary};
pub use volatility_model::{annualize, ForecastMapping, WalkForwardPoint};
pub use volatility_traits::{FittedModel, VolatilityModel};
pub use walk_forward::{walk_forward, walk_forward_fraction};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};

    use crate::returns::{ReturnSeries, SeriesPoint};
    use crate::utils::time_utils::business_days_after;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let anchor = NaiveDate::from_ymd_opt(2014, 12, 31).unwrap();
        business_days_after(anchor, n)
    }

    /// Simulated GARCH(1,1) returns on consecutive business days.
    pub fn simulate_garch(
        n: usize,
        mu: f64,
        omega: f64,
        alpha: f64,
        beta: f64,
        seed: u64,
    ) -> ReturnSeries {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sigma2 = omega / (1.0 - alpha - beta);
        let mut eps2 = sigma2;

        let points = dates(n)
            .into_iter()
            .map(|date| {
                sigma2 = omega + alpha * eps2 + beta * sigma2;
                let z: f64 = StandardNormal.sample(&mut rng);
                let eps = sigma2.sqrt() * z;
                eps2 = eps * eps;
                SeriesPoint::new(date, mu + eps)
            })
            .collect();
        ReturnSeries::new(points).unwrap()
    }

    pub fn constant_series(n: usize, value: f64) -> ReturnSeries {
        ReturnSeries::new(
            dates(n)
                .into_iter()
                .map(|date| SeriesPoint::new(date, value))
                .collect(),
        )
        .unwrap()
    }
}
