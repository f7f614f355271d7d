use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::TRADING_DAYS_PER_YEAR;
use crate::errors::{Error, Result};
use crate::utils::stats_utils;

/// A dated observation (a return, or a volatility estimate for that date).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Daily percentage returns, strictly ascending by date.
///
/// The series is immutable once built; slicing methods return new series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SeriesPoint>", into = "Vec<SeriesPoint>")]
pub struct ReturnSeries {
    points: Vec<SeriesPoint>,
}

/// Summary statistics of a return series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (`n - 1`), i.e. daily volatility.
    pub std_dev: f64,
    pub annualized_volatility: f64,
    pub min: f64,
    pub max: f64,
}

impl ReturnSeries {
    /// Build a series from caller-supplied points.
    ///
    /// Dates must be strictly increasing and values finite.
    pub fn new(points: Vec<SeriesPoint>) -> Result<Self> {
        for (i, point) in points.iter().enumerate() {
            if !point.value.is_finite() {
                return Err(Error::MalformedInput(format!(
                    "return on {} is not finite",
                    point.date
                )));
            }
            if i > 0 && points[i - 1].date >= point.date {
                return Err(Error::MalformedInput(format!(
                    "return dates must be strictly increasing ({} follows {})",
                    point.date,
                    points[i - 1].date
                )));
            }
        }
        Ok(Self { points })
    }

    /// Caller guarantees ordering and finiteness.
    pub(crate) fn from_sorted(points: Vec<SeriesPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// The first `n` observations.
    pub fn head(&self, n: usize) -> ReturnSeries {
        Self::from_sorted(self.points.iter().take(n).copied().collect())
    }

    /// The most recent `n` observations.
    pub fn tail(&self, n: usize) -> ReturnSeries {
        let start = self.points.len().saturating_sub(n);
        Self::from_sorted(self.points[start..].to_vec())
    }

    /// Split into a training prefix of `floor(fraction * len)` points and the
    /// remaining test suffix.
    pub fn split_at_fraction(&self, fraction: f64) -> Result<(ReturnSeries, ReturnSeries)> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(Error::MalformedInput(format!(
                "split fraction must be within [0, 1], got {}",
                fraction
            )));
        }
        let cut = (fraction * self.points.len() as f64).floor() as usize;
        let (train, test) = self.points.split_at(cut);
        Ok((
            Self::from_sorted(train.to_vec()),
            Self::from_sorted(test.to_vec()),
        ))
    }

    /// Count, mean, sample standard deviation and its annualized value.
    pub fn stats(&self) -> Result<ReturnStats> {
        let values = self.values();
        let (Some(mean), Some(std_dev)) = (
            stats_utils::mean(&values),
            stats_utils::sample_std(&values),
        ) else {
            return Err(Error::MalformedInput(format!(
                "statistics need at least 2 returns, got {}",
                values.len()
            )));
        };

        Ok(ReturnStats {
            count: values.len(),
            mean,
            std_dev,
            annualized_volatility: std_dev * TRADING_DAYS_PER_YEAR.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }

    /// Sample standard deviation over each trailing `window`, dated at the
    /// window's last observation. The first `window - 1` dates have no value.
    pub fn rolling_std(&self, window: usize) -> Result<Vec<SeriesPoint>> {
        if window < 2 {
            return Err(Error::MalformedInput(format!(
                "rolling window must be at least 2, got {}",
                window
            )));
        }

        let values = self.values();
        Ok(values
            .windows(window)
            .zip(self.points.iter().skip(window - 1))
            .filter_map(|(slice, point)| {
                stats_utils::sample_std(slice).map(|std| SeriesPoint::new(point.date, std))
            })
            .collect())
    }
}

impl TryFrom<Vec<SeriesPoint>> for ReturnSeries {
    type Error = Error;

    fn try_from(points: Vec<SeriesPoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<ReturnSeries> for Vec<SeriesPoint> {
    fn from(series: ReturnSeries) -> Self {
        series.points
    }
}
