//! Price series provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{OutputSize, PriceTable};

/// Trait for daily price series sources.
///
/// Consumers depend on this trait rather than a concrete vendor client so
/// that tests can substitute a fixture-backed provider.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use volcast_market_data::{MarketDataError, OutputSize, PriceSeriesProvider, PriceTable};
///
/// struct FixtureProvider {
///     table: PriceTable,
/// }
///
/// #[async_trait]
/// impl PriceSeriesProvider for FixtureProvider {
///     fn id(&self) -> &'static str {
///         "FIXTURE"
///     }
///
///     async fn fetch_daily(
///         &self,
///         _ticker: &str,
///         _output_size: OutputSize,
///         row_limit: Option<usize>,
///     ) -> Result<PriceTable, MarketDataError> {
///         Ok(match row_limit {
///             Some(n) => self.table.head(n),
///             None => self.table.clone(),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait PriceSeriesProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch the daily OHLCV series for `ticker`.
    ///
    /// # Arguments
    ///
    /// * `ticker` - The vendor symbol (e.g., "MSFT")
    /// * `output_size` - How much history to request
    /// * `row_limit` - Keep only the most recent N rows when set
    ///
    /// # Returns
    ///
    /// A freshly built [`PriceTable`], newest row first.
    async fn fetch_daily(
        &self,
        ticker: &str,
        output_size: OutputSize,
        row_limit: Option<usize>,
    ) -> Result<PriceTable, MarketDataError>;
}
