//! Volcast Market Data Crate
//!
//! This crate fetches daily equity price series from a market-data vendor
//! and normalizes them into a [`PriceTable`].
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +----------------------+
//! |   ticker symbol  | --> | PriceSeriesProvider  |  (Alpha Vantage)
//! +------------------+     +----------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   PriceTable     |  (date-indexed OHLCV)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`PriceTable`] - One row per trading date with `open, high, low, close, volume`
//! - [`PriceBar`] - A single dated OHLCV row
//! - [`OutputSize`] - How much history the vendor should return
//! - [`MarketDataError`] - Transport, symbol, rate-limit and configuration failures

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{OutputSize, PriceBar, PriceTable};
pub use provider::alpha_vantage::{AlphaVantageProvider, ProviderConfig};
pub use provider::PriceSeriesProvider;
