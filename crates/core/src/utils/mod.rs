pub mod stats_utils;
pub mod time_utils;
