//! Volcast Core - returns extraction, volatility models, and orchestration.
//!
//! This crate turns a [`PriceTable`](volcast_market_data::PriceTable) into a
//! daily percentage [`ReturnSeries`](returns::ReturnSeries) and forecasts its
//! conditional volatility with a GARCH(1,1) model. The statistical estimator
//! sits behind the [`VolatilityModel`](volatility::VolatilityModel) trait so
//! the date handling and error taxonomy do not depend on it.

pub mod analysis;
pub mod constants;
pub mod errors;
pub mod returns;
pub mod utils;
pub mod volatility;

// Re-export error types
pub use errors::Error;
pub use errors::ModelFitError;
pub use errors::Result;
