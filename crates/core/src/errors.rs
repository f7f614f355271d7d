//! Core error types for the Volcast application.
//!
//! Market-data failures (transport, invalid symbol, rate limit) are wrapped
//! from the market-data crate; the remaining kinds originate here.

use thiserror::Error;
use volcast_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the fetch / returns / forecast pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Model fit failed: {0}")]
    ModelFit(#[from] ModelFitError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Failures of the conditional-volatility estimator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelFitError {
    #[error("Insufficient data: {found} observations, at least {required} required")]
    InsufficientData { found: usize, required: usize },

    #[error("Non-finite value at position {0}")]
    NonFiniteInput(usize),

    #[error("Series has zero variance")]
    DegenerateSeries,

    #[error("Optimizer did not converge after {0} iterations")]
    NonConvergence(usize),

    #[error("Numerical error: {0}")]
    NumericalError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_data_error_wraps() {
        let err: Error = MarketDataError::InvalidSymbol("ZZZZ".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Market data operation failed: Invalid symbol: ZZZZ"
        );
    }

    #[test]
    fn test_model_fit_error_display() {
        let err: Error = ModelFitError::InsufficientData {
            found: 3,
            required: 20,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Model fit failed: Insufficient data: 3 observations, at least 20 required"
        );
    }
}
