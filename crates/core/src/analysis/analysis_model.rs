use serde::{Deserialize, Serialize};
use volcast_market_data::{OutputSize, PriceBar};

use crate::constants::{DEFAULT_HORIZON_DAYS, DEFAULT_RETURNS_LIMIT};
use crate::returns::ReturnStats;
use crate::volatility::{ForecastMapping, GarchSummary};

const DAILY_UNIT_LABEL: &str = "Daily Volatility (% change per day)";
const ANNUALIZED_UNIT_LABEL: &str = "Annualized Volatility (% change per year)";

/// Inputs for a full fetch / returns / forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub ticker: String,
    #[serde(default)]
    pub output_size: OutputSize,
    /// Most recent price rows to keep; `None` keeps all.
    #[serde(default)]
    pub row_limit: Option<usize>,
    #[serde(default = "default_returns_limit")]
    pub returns_limit: usize,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: usize,
    #[serde(default)]
    pub annualized: bool,
}

fn default_returns_limit() -> usize {
    DEFAULT_RETURNS_LIMIT
}

fn default_horizon_days() -> usize {
    DEFAULT_HORIZON_DAYS
}

impl AnalysisRequest {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            output_size: OutputSize::default(),
            row_limit: None,
            returns_limit: DEFAULT_RETURNS_LIMIT,
            horizon_days: DEFAULT_HORIZON_DAYS,
            annualized: false,
        }
    }

    pub fn output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn row_limit(mut self, row_limit: Option<usize>) -> Self {
        self.row_limit = row_limit;
        self
    }

    pub fn horizon_days(mut self, horizon_days: usize) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn annualized(mut self, annualized: bool) -> Self {
        self.annualized = annualized;
        self
    }
}

/// Everything the dashboard shows for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilityReport {
    pub ticker: String,
    /// Leading rows of the fetched table, in the order they were received.
    pub latest_prices: Vec<PriceBar>,
    pub price_rows: usize,
    pub return_stats: ReturnStats,
    pub model: GarchSummary,
    pub annualized: bool,
    pub unit_label: String,
    pub forecast: ForecastMapping,
}

pub(crate) fn unit_label(annualized: bool) -> &'static str {
    if annualized {
        ANNUALIZED_UNIT_LABEL
    } else {
        DAILY_UNIT_LABEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_from_json() {
        let request: AnalysisRequest = serde_json::from_str(r#"{"ticker":"IBM"}"#).unwrap();
        assert_eq!(request, AnalysisRequest::new("IBM"));
        assert_eq!(request.horizon_days, 5);
        assert_eq!(request.returns_limit, 2500);
        assert_eq!(request.output_size, OutputSize::Compact);
    }

    #[test]
    fn test_unit_label() {
        assert_eq!(unit_label(false), "Daily Volatility (% change per day)");
        assert_eq!(unit_label(true), "Annualized Volatility (% change per year)");
    }
}
