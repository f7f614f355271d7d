//! GARCH(1,1) with a constant mean and Gaussian innovations.
//!
//! ```text
//! r_t       = mu + eps_t
//! sigma2_t  = omega + alpha * eps_{t-1}^2 + beta * sigma2_{t-1}
//! ```
//!
//! Parameters are estimated by minimizing the Gaussian negative
//! log-likelihood with Nelder-Mead. The pre-sample squared residual and
//! variance are both replaced by an exponentially weighted backcast of the
//! early squared residuals.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use super::optimizer::{self, NelderMeadOptions};
use super::volatility_traits::{FittedModel, VolatilityModel};
use crate::constants::MIN_GARCH_OBSERVATIONS;
use crate::errors::ModelFitError;
use crate::returns::{ReturnSeries, SeriesPoint};
use crate::utils::stats_utils;

/// Number of estimated parameters (`mu`, `omega`, `alpha`, `beta`).
const PARAM_COUNT: usize = 4;

const BACKCAST_WINDOW: usize = 75;
const BACKCAST_DECAY: f64 = 0.94;

/// Variance below which a series is treated as constant.
const MIN_VARIANCE: f64 = 1e-12;

const GRID_ALPHA: [f64; 3] = [0.03, 0.07, 0.15];
const GRID_PERSISTENCE: [f64; 3] = [0.5, 0.9, 0.98];

/// Estimated GARCH(1,1) coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GarchParams {
    pub mu: f64,
    pub omega: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl GarchParams {
    fn from_slice(x: &[f64]) -> Self {
        Self {
            mu: x[0],
            omega: x[1],
            alpha: x[2],
            beta: x[3],
        }
    }

    /// `alpha + beta`.
    pub fn persistence(&self) -> f64 {
        self.alpha + self.beta
    }

    /// Positive intercept, non-negative ARCH/GARCH terms, covariance stationary.
    pub fn is_feasible(&self) -> bool {
        self.omega > 0.0 && self.alpha >= 0.0 && self.beta >= 0.0 && self.persistence() < 1.0
    }

    /// Long-run variance `omega / (1 - alpha - beta)`, if stationary.
    pub fn unconditional_variance(&self) -> Option<f64> {
        let gap = 1.0 - self.persistence();
        (gap > 0.0).then(|| self.omega / gap)
    }
}

/// GARCH(1,1) estimator.
#[derive(Debug, Clone)]
pub struct GarchModel {
    min_observations: usize,
    options: NelderMeadOptions,
}

impl Default for GarchModel {
    fn default() -> Self {
        Self {
            min_observations: MIN_GARCH_OBSERVATIONS,
            options: NelderMeadOptions {
                max_iterations: 5_000,
                f_tolerance: 1e-10,
                x_tolerance: 1e-7,
            },
        }
    }
}

impl GarchModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap on optimizer iterations per simplex run.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.options.max_iterations = max_iterations;
        self
    }

    fn validate(&self, values: &[f64]) -> Result<(f64, f64), ModelFitError> {
        if values.len() < self.min_observations {
            return Err(ModelFitError::InsufficientData {
                found: values.len(),
                required: self.min_observations,
            });
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ModelFitError::NonFiniteInput(pos));
        }

        let mean = stats_utils::mean(values).ok_or(ModelFitError::InsufficientData {
            found: 0,
            required: self.min_observations,
        })?;
        let variance = stats_utils::sample_variance(values).ok_or_else(|| {
            ModelFitError::NumericalError("sample variance is not finite".to_string())
        })?;
        if variance < MIN_VARIANCE {
            return Err(ModelFitError::DegenerateSeries);
        }
        Ok((mean, variance))
    }

    /// Best point of a small grid over `alpha` and `alpha + beta`.
    fn starting_point(values: &[f64], backcast: f64, mean: f64, variance: f64) -> Vec<f64> {
        let mut best: Option<(f64, Vec<f64>)> = None;
        for alpha in GRID_ALPHA {
            for persistence in GRID_PERSISTENCE {
                let candidate = vec![mean, variance * (1.0 - persistence), alpha, persistence - alpha];
                let nll = negative_log_likelihood(&candidate, values, backcast);
                if best.as_ref().map_or(true, |(b, _)| nll < *b) {
                    best = Some((nll, candidate));
                }
            }
        }
        best.map(|(_, x)| x)
            .unwrap_or_else(|| vec![mean, variance * 0.1, 0.05, 0.85])
    }

    fn simplex_steps(x: &[f64], std_dev: f64) -> Vec<f64> {
        vec![0.1 * std_dev, 0.5 * x[1], 0.02, -0.05]
    }
}

impl VolatilityModel for GarchModel {
    type Fitted = GarchFit;

    fn name(&self) -> &'static str {
        "GARCH(1,1)"
    }

    fn fit(&self, returns: &ReturnSeries) -> Result<GarchFit, ModelFitError> {
        let values = returns.values();
        let (mean, variance) = self.validate(&values)?;
        let std_dev = variance.sqrt();

        let centered: Vec<f64> = values.iter().map(|v| v - mean).collect();
        let backcast = compute_backcast(&centered);

        let start = Self::starting_point(&values, backcast, mean, variance);
        let objective = |x: &[f64]| negative_log_likelihood(x, &values, backcast);

        let first = optimizer::minimize(
            objective,
            &start,
            &Self::simplex_steps(&start, std_dev),
            &self.options,
        );
        // A fresh simplex around the first optimum guards against premature collapse.
        let second = optimizer::minimize(
            objective,
            &first.point,
            &Self::simplex_steps(&first.point, std_dev),
            &self.options,
        );
        let iterations = first.iterations + second.iterations;

        if !second.converged {
            return Err(ModelFitError::NonConvergence(iterations));
        }
        if !second.value.is_finite() {
            return Err(ModelFitError::NumericalError(
                "likelihood is not finite at the optimum".to_string(),
            ));
        }

        let params = GarchParams::from_slice(&second.point);
        let residuals: Vec<f64> = values.iter().map(|v| v - params.mu).collect();
        let conditional_variance = conditional_variance(&params, &residuals, backcast);

        let n = values.len() as f64;
        let log_likelihood = -second.value;
        let k = PARAM_COUNT as f64;

        debug!(
            "GARCH(1,1) fit on {} returns in {} iterations: mu={:.6} omega={:.6} alpha={:.4} beta={:.4}",
            values.len(),
            iterations,
            params.mu,
            params.omega,
            params.alpha,
            params.beta
        );

        Ok(GarchFit {
            params,
            log_likelihood,
            aic: 2.0 * k - 2.0 * log_likelihood,
            bic: k * n.ln() - 2.0 * log_likelihood,
            iterations,
            dates: returns.dates(),
            residuals,
            conditional_variance,
        })
    }
}

/// Exponentially weighted mean of the first squared residuals.
fn compute_backcast(residuals: &[f64]) -> f64 {
    let window = residuals.len().min(BACKCAST_WINDOW);
    let mut weight = 1.0;
    let mut total_weight = 0.0;
    let mut acc = 0.0;
    for eps in &residuals[..window] {
        acc += weight * eps * eps;
        total_weight += weight;
        weight *= BACKCAST_DECAY;
    }
    if total_weight > 0.0 {
        acc / total_weight
    } else {
        0.0
    }
}

/// In-sample `sigma2_t` for every residual.
fn conditional_variance(params: &GarchParams, residuals: &[f64], backcast: f64) -> Vec<f64> {
    let mut sigma2 = Vec::with_capacity(residuals.len());
    let mut prev_eps2 = backcast;
    let mut prev_sigma2 = backcast;
    for eps in residuals {
        let s2 = params.omega + params.alpha * prev_eps2 + params.beta * prev_sigma2;
        sigma2.push(s2);
        prev_eps2 = eps * eps;
        prev_sigma2 = s2;
    }
    sigma2
}

/// Gaussian negative log-likelihood; `+inf` outside the feasible region.
fn negative_log_likelihood(x: &[f64], values: &[f64], backcast: f64) -> f64 {
    let params = GarchParams::from_slice(x);
    if !params.is_feasible() {
        return f64::INFINITY;
    }

    let ln_2pi = (2.0 * std::f64::consts::PI).ln();
    let mut prev_eps2 = backcast;
    let mut prev_sigma2 = backcast;
    let mut nll = 0.0;
    for value in values {
        let sigma2 = params.omega + params.alpha * prev_eps2 + params.beta * prev_sigma2;
        if !sigma2.is_finite() || sigma2 <= 0.0 {
            return f64::INFINITY;
        }
        let eps = value - params.mu;
        nll += 0.5 * (ln_2pi + sigma2.ln() + eps * eps / sigma2);
        prev_eps2 = eps * eps;
        prev_sigma2 = sigma2;
    }
    nll
}

/// A fitted GARCH(1,1) model and its in-sample diagnostics.
#[derive(Debug, Clone)]
pub struct GarchFit {
    params: GarchParams,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
    iterations: usize,
    dates: Vec<NaiveDate>,
    residuals: Vec<f64>,
    conditional_variance: Vec<f64>,
}

/// Serializable digest of a [`GarchFit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarchSummary {
    pub model: String,
    pub params: GarchParams,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub persistence: f64,
    pub unconditional_variance: Option<f64>,
    pub observations: usize,
}

impl GarchFit {
    pub fn params(&self) -> GarchParams {
        self.params
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    pub fn persistence(&self) -> f64 {
        self.params.persistence()
    }

    pub fn unconditional_variance(&self) -> Option<f64> {
        self.params.unconditional_variance()
    }

    pub fn observations(&self) -> usize {
        self.residuals.len()
    }

    /// Total optimizer iterations over both simplex runs.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// In-sample conditional standard deviation per date.
    pub fn conditional_volatility(&self) -> Vec<SeriesPoint> {
        self.dates
            .iter()
            .zip(&self.conditional_variance)
            .map(|(date, s2)| SeriesPoint::new(*date, s2.sqrt()))
            .collect()
    }

    /// `r_t - mu` per date.
    pub fn residuals(&self) -> Vec<SeriesPoint> {
        self.dates
            .iter()
            .zip(&self.residuals)
            .map(|(date, eps)| SeriesPoint::new(*date, *eps))
            .collect()
    }

    /// Residuals divided by their conditional standard deviation.
    pub fn standardized_residuals(&self) -> Vec<SeriesPoint> {
        self.dates
            .iter()
            .zip(self.residuals.iter().zip(&self.conditional_variance))
            .map(|(date, (eps, s2))| SeriesPoint::new(*date, eps / s2.sqrt()))
            .collect()
    }

    pub fn summary(&self) -> GarchSummary {
        GarchSummary {
            model: "GARCH(1,1)".to_string(),
            params: self.params,
            log_likelihood: self.log_likelihood,
            aic: self.aic,
            bic: self.bic,
            persistence: self.persistence(),
            unconditional_variance: self.unconditional_variance(),
            observations: self.observations(),
        }
    }
}

impl FittedModel for GarchFit {
    fn forecast_variance(&self, horizon: usize) -> Vec<f64> {
        let (Some(eps), Some(sigma2)) = (self.residuals.last(), self.conditional_variance.last())
        else {
            return Vec::new();
        };

        let p = &self.params;
        let mut forecasts = Vec::with_capacity(horizon);
        let mut next = p.omega + p.alpha * eps * eps + p.beta * sigma2;
        for _ in 0..horizon {
            forecasts.push(next);
            next = p.omega + p.persistence() * next;
        }
        forecasts
    }
}
