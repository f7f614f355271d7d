use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// A single trading day of OHLCV data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Date-indexed price table with exactly one row per date.
///
/// Row order is whatever the producer built. Vendor fetches come back
/// newest-first; use [`sorted_ascending`](Self::sorted_ascending) when
/// chronological order matters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceTable {
    rows: Vec<PriceBar>,
}

impl PriceTable {
    /// Canonical column names, in vendor order.
    pub const COLUMNS: [&'static str; 5] = ["open", "high", "low", "close", "volume"];

    /// Name of the date index.
    pub const INDEX_NAME: &'static str = "date";

    /// Build a table, rejecting duplicate dates.
    pub fn new(rows: Vec<PriceBar>) -> Result<Self, MarketDataError> {
        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row.date) {
                return Err(MarketDataError::MalformedTable(format!(
                    "duplicate date {}",
                    row.date
                )));
            }
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PriceBar] {
        &self.rows
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.rows.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Values of a named column, or `None` if the name is not one of
    /// [`COLUMNS`](Self::COLUMNS).
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let pick: fn(&PriceBar) -> f64 = match name {
            "open" => |r: &PriceBar| r.open,
            "high" => |r: &PriceBar| r.high,
            "low" => |r: &PriceBar| r.low,
            "close" => |r: &PriceBar| r.close,
            "volume" => |r: &PriceBar| r.volume,
            _ => return None,
        };
        Some(self.rows.iter().map(pick).collect())
    }

    /// The first `n` rows in current order.
    pub fn head(&self, n: usize) -> PriceTable {
        Self {
            rows: self.rows.iter().take(n).copied().collect(),
        }
    }

    /// A copy ordered by date, oldest first.
    pub fn sorted_ascending(&self) -> PriceTable {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|r| r.date);
        Self { rows }
    }

    /// A copy ordered by date, newest first (the vendor's order).
    pub fn sorted_descending(&self) -> PriceTable {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Self { rows }
    }

    pub(crate) fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }
}

impl TryFrom<Vec<PriceBar>> for PriceTable {
    type Error = MarketDataError;

    fn try_from(rows: Vec<PriceBar>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<PriceTable> for Vec<PriceBar> {
    fn from(table: PriceTable) -> Self {
        table.rows
    }
}
