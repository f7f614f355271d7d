//! Alpha Vantage market data provider implementation.
//!
//! Equities via the TIME_SERIES_DAILY endpoint. The vendor returns a JSON
//! object keyed by ISO date, newest first, with ordinal-prefixed field names
//! ("1. open" .. "5. volume").
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute. Throttled
//! calls come back as HTTP 200 with a "Note" (or "Information") field.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{OutputSize, PriceBar, PriceTable};
use crate::provider::PriceSeriesProvider;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";
const TIME_SERIES_KEY: &str = "Time Series (Daily)";

/// Connection settings for [`AlphaVantageProvider`].
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// Query endpoint, overridable for proxies and tests.
    pub base_url: String,
    /// Whole-request timeout for a single vendor call.
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Alpha Vantage daily price provider.
///
/// The API key is injected at construction; the provider never reads the
/// environment itself.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: reqwest::Url,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// Top-level TIME_SERIES_DAILY envelope. The series itself is kept as raw
/// JSON so vendor error fields are inspected before the series is parsed.
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<Value>,
    #[serde(rename = "Error Message")]
    error_message: Option<Value>,
    #[serde(rename = "Note")]
    note: Option<Value>,
    #[serde(rename = "Information")]
    information: Option<Value>,
}

/// Fields of one daily entry after stripping the ordinal prefixes.
#[derive(Debug, Default)]
struct DailyFields {
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

impl DailyFields {
    fn into_bar(self, date: NaiveDate) -> Option<PriceBar> {
        Some(PriceBar::new(
            date,
            self.open?,
            self.high?,
            self.low?,
            self.close?,
            self.volume?,
        ))
    }
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

impl AlphaVantageProvider {
    /// Create a provider against the public endpoint with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`MarketDataError::Configuration`] if the key is blank or the
    /// HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self, MarketDataError> {
        Self::with_config(api_key, ProviderConfig::default())
    }

    /// Create a provider with explicit connection settings.
    pub fn with_config(
        api_key: impl Into<String>,
        config: ProviderConfig,
    ) -> Result<Self, MarketDataError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MarketDataError::Configuration(
                "Alpha Vantage API key is empty".to_string(),
            ));
        }

        let base_url = reqwest::Url::parse(&config.base_url).map_err(|e| {
            MarketDataError::Configuration(format!(
                "Invalid Alpha Vantage URL {}: {}",
                config.base_url, e
            ))
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                MarketDataError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    /// Make a request to the Alpha Vantage API and return the raw body.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));

        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(all_params.iter());

        debug!(
            "Alpha Vantage request: {}",
            url.as_str().replace(&self.api_key, "***")
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string().replace(&self.api_key, "***")
            };
            MarketDataError::transport(PROVIDER_ID, message)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::transport(
                PROVIDER_ID,
                format!("HTTP {}", status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::transport(PROVIDER_ID, e.to_string()))
    }

    /// Check for API-level errors in the response.
    ///
    /// Precedence: "Error Message" beats "Note", which beats "Information".
    fn check_api_error(response: &TimeSeriesResponse) -> Result<(), MarketDataError> {
        if let Some(ref msg) = response.error_message {
            return Err(MarketDataError::InvalidSymbol(format!(
                "Error encountered while fetching data: {}",
                value_text(msg)
            )));
        }

        // Any "Note" is the vendor's throttling notice.
        if let Some(ref msg) = response.note {
            return Err(MarketDataError::rate_limited(PROVIDER_ID, value_text(msg)));
        }

        if let Some(ref msg) = response.information {
            let text = value_text(msg);
            let lower = text.to_ascii_lowercase();
            if lower.contains("api call frequency") || lower.contains("rate limit") {
                return Err(MarketDataError::rate_limited(PROVIDER_ID, text));
            }
            warn!("Alpha Vantage info: {}", text);
        }

        Ok(())
    }

    /// Parse a date string in YYYY-MM-DD format.
    fn parse_date(date_str: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
    }

    /// Parse a numeric field; the vendor sends numbers as strings.
    fn parse_number(value: &Value) -> Option<f64> {
        match value {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Strip the vendor's ordinal prefix: "1. open" -> "open".
    fn canonical_field(name: &str) -> &str {
        name.split_once(". ").map_or(name, |(_, rest)| rest).trim()
    }

    fn parse_daily_fields(fields: &Map<String, Value>) -> Option<DailyFields> {
        let mut daily = DailyFields::default();
        for (name, value) in fields {
            let slot = match Self::canonical_field(name) {
                "open" => &mut daily.open,
                "high" => &mut daily.high,
                "low" => &mut daily.low,
                "close" => &mut daily.close,
                "volume" => &mut daily.volume,
                _ => continue,
            };
            *slot = Some(Self::parse_number(value)?);
        }
        Some(daily)
    }

    /// Validate a raw TIME_SERIES_DAILY body and build a price table.
    ///
    /// Rows come back newest-first. `row_limit` keeps the N most recent rows;
    /// `Some(0)` means no limit.
    fn parse_time_series(
        text: &str,
        ticker: &str,
        row_limit: Option<usize>,
    ) -> Result<PriceTable, MarketDataError> {
        let invalid = || {
            MarketDataError::InvalidSymbol(format!(
                "Invalid API call for {}. Please enter a valid ticker symbol.",
                ticker
            ))
        };

        let response: TimeSeriesResponse = serde_json::from_str(text).map_err(|e| {
            debug!("Alpha Vantage: unparseable body for {}: {}", ticker, e);
            invalid()
        })?;

        Self::check_api_error(&response)?;

        let series = match response.time_series {
            Some(Value::Object(series)) if !series.is_empty() => series,
            _ => return Err(invalid()),
        };

        let mut rows = Vec::with_capacity(series.len());
        for (date_str, entry) in &series {
            let bar = Self::parse_date(date_str)
                .zip(entry.as_object())
                .and_then(|(date, fields)| Self::parse_daily_fields(fields)?.into_bar(date));
            match bar {
                Some(bar) => rows.push(bar),
                None => {
                    debug!(
                        "Alpha Vantage: malformed entry {} for {} in {}",
                        date_str, ticker, TIME_SERIES_KEY
                    );
                    return Err(invalid());
                }
            }
        }

        // The vendor orders by freshness, but JSON object order is not a
        // contract; sort explicitly before truncating.
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        let mut table = PriceTable::new(rows).map_err(|_| invalid())?;

        if let Some(limit) = row_limit.filter(|n| *n > 0) {
            table.truncate(limit);
        }

        Ok(table)
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// PriceSeriesProvider trait implementation
// ============================================================================

#[async_trait]
impl PriceSeriesProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_daily(
        &self,
        ticker: &str,
        output_size: OutputSize,
        row_limit: Option<usize>,
    ) -> Result<PriceTable, MarketDataError> {
        let symbol = ticker.trim();
        if symbol.is_empty() {
            return Err(MarketDataError::InvalidSymbol(
                "Ticker symbol is empty".to_string(),
            ));
        }

        let params = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", output_size.as_str()),
            ("datatype", "json"),
        ];

        let text = self.fetch(&params).await?;
        let table = Self::parse_time_series(&text, symbol, row_limit)?;

        debug!(
            "Alpha Vantage: fetched {} daily rows for {}",
            table.len(),
            symbol
        );

        Ok(table)
    }
}
