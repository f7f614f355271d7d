//! Returns module - daily percentage returns derived from a price table.

mod returns_extractor;
mod returns_model;

pub use returns_extractor::{extract_default_returns, extract_returns};
pub use returns_model::{ReturnSeries, ReturnStats, SeriesPoint};
