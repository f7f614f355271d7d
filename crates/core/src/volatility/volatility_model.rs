use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::TRADING_DAYS_PER_YEAR;

/// Scale a daily volatility to an annual one.
pub fn annualize(volatility: f64) -> f64 {
    volatility * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Forecast volatility keyed by business date.
///
/// Serializes as a JSON object with `YYYY-MM-DD` keys in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<NaiveDate, f64>",
    into = "BTreeMap<NaiveDate, f64>"
)]
pub struct ForecastMapping {
    entries: Vec<(NaiveDate, f64)>,
}

impl ForecastMapping {
    /// Pairs must be strictly ascending by date.
    pub(crate) fn from_entries(entries: Vec<(NaiveDate, f64)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(NaiveDate, f64)] {
        &self.entries
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.entries.iter().map(|(d, _)| *d).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.entries
            .binary_search_by(|(d, _)| d.cmp(&date))
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Keys formatted as `YYYY-MM-DD`.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(d, _)| d.format("%Y-%m-%d").to_string())
            .collect()
    }

    pub fn to_map(&self) -> BTreeMap<NaiveDate, f64> {
        self.entries.iter().copied().collect()
    }

    /// Every value multiplied by `sqrt(252)`.
    pub fn annualized(&self) -> ForecastMapping {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(d, v)| (*d, annualize(*v)))
                .collect(),
        }
    }
}

impl From<BTreeMap<NaiveDate, f64>> for ForecastMapping {
    fn from(map: BTreeMap<NaiveDate, f64>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}

impl From<ForecastMapping> for BTreeMap<NaiveDate, f64> {
    fn from(mapping: ForecastMapping) -> Self {
        mapping.entries.into_iter().collect()
    }
}

/// One out-of-sample step of a walk-forward evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkForwardPoint {
    pub date: NaiveDate,
    /// Return actually observed on `date`.
    pub realized_return: f64,
    /// One-step-ahead volatility forecast made with data before `date`.
    pub forecast_volatility: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn mapping() -> ForecastMapping {
        ForecastMapping::from_entries(vec![(date(8), 1.0), (date(9), 1.5), (date(10), 2.0)])
    }

    #[test]
    fn test_serializes_as_date_keyed_object() {
        let json = serde_json::to_string(&mapping()).unwrap();
        assert_eq!(
            json,
            r#"{"2024-01-08":1.0,"2024-01-09":1.5,"2024-01-10":2.0}"#
        );

        let parsed: ForecastMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, mapping());
    }

    #[test]
    fn test_annualized_scales_by_sqrt_252() {
        let annual = mapping().annualized();
        assert_eq!(annual.dates(), mapping().dates());
        assert!((annual.values()[0] - 252f64.sqrt()).abs() < 1e-12);
        assert!((annualize(2.0) - 2.0 * 252f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_lookup() {
        let m = mapping();
        assert_eq!(m.get(date(9)), Some(1.5));
        assert_eq!(m.get(date(11)), None);
        assert_eq!(m.keys()[0], "2024-01-08");
        assert_eq!(m.to_map().len(), 3);
    }
}
