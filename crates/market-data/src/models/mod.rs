//! Market data models
//!
//! - `price_table` - Date-indexed OHLCV rows (PriceBar, PriceTable)
//! - `output_size` - Vendor history depth selector (OutputSize)

mod output_size;
mod price_table;

pub use output_size::OutputSize;
pub use price_table::{PriceBar, PriceTable};
