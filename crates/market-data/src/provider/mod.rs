//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `PriceSeriesProvider` trait that price sources implement
//! - The Alpha Vantage implementation

mod traits;

pub mod alpha_vantage;

pub use traits::PriceSeriesProvider;
