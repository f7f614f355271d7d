/// Default number of most recent returns kept by the extractor.
pub const DEFAULT_RETURNS_LIMIT: usize = 2500;

/// Trading days per year used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default window for rolling volatility.
pub const DEFAULT_ROLLING_WINDOW: usize = 30;

/// Default share of the series held out for walk-forward evaluation.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Rows of the fetched price table echoed back in a volatility report.
pub const REPORT_PRICE_PREVIEW_ROWS: usize = 10;

/// Fewest observations the GARCH estimator accepts.
pub const MIN_GARCH_OBSERVATIONS: usize = 20;

/// Forecast horizon used when a caller does not choose one.
pub const DEFAULT_HORIZON_DAYS: usize = 5;

/// Longest forecast horizon accepted from external callers.
pub const MAX_HORIZON_DAYS: usize = 365;
