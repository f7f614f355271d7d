use log::debug;
use volcast_market_data::PriceTable;

use super::returns_model::{ReturnSeries, SeriesPoint};
use crate::constants::DEFAULT_RETURNS_LIMIT;
use crate::errors::{Error, Result};

/// Daily percentage returns of `close`, oldest first, keeping the most
/// recent `limit` observations.
///
/// The table is read, never modified, and may be in any row order. Each
/// return is `(close_t / close_{t-1} - 1) * 100`; the first date has no
/// prior close and is dropped.
///
/// # Errors
///
/// [`Error::MalformedInput`] if a close is not finite, or is zero where it
/// would be a divisor.
pub fn extract_returns(table: &PriceTable, limit: usize) -> Result<ReturnSeries> {
    let sorted = table.sorted_ascending();
    let rows = sorted.rows();

    if let Some(bad) = rows.iter().find(|r| !r.close.is_finite()) {
        return Err(Error::MalformedInput(format!(
            "close on {} is not a finite number",
            bad.date
        )));
    }

    let mut points = Vec::with_capacity(rows.len().saturating_sub(1));
    for pair in rows.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        if prev.close == 0.0 {
            return Err(Error::MalformedInput(format!(
                "close on {} is zero; return on {} is undefined",
                prev.date, cur.date
            )));
        }
        points.push(SeriesPoint::new(
            cur.date,
            (cur.close / prev.close - 1.0) * 100.0,
        ));
    }

    let start = points.len().saturating_sub(limit);
    points.drain(..start);

    debug!(
        "Extracted {} returns from {} price rows (limit {})",
        points.len(),
        rows.len(),
        limit
    );

    Ok(ReturnSeries::from_sorted(points))
}

/// [`extract_returns`] with the default limit of 2500 observations.
pub fn extract_default_returns(table: &PriceTable) -> Result<ReturnSeries> {
    extract_returns(table, DEFAULT_RETURNS_LIMIT)
}
