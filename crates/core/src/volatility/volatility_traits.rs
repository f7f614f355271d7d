use crate::errors::ModelFitError;
use crate::returns::ReturnSeries;

/// A conditional-volatility estimator.
///
/// Implementations are stateless; each call to [`fit`](Self::fit) estimates a
/// fresh model from the given series.
pub trait VolatilityModel: Send + Sync {
    type Fitted: FittedModel;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn fit(&self, returns: &ReturnSeries) -> Result<Self::Fitted, ModelFitError>;
}

/// An estimated model able to project variance past the end of its sample.
pub trait FittedModel: Send + Sync {
    /// Variance for steps `1..=horizon` after the last observation, in the
    /// squared units of the input series.
    fn forecast_variance(&self, horizon: usize) -> Vec<f64>;
}
