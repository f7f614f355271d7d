//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while fetching and normalizing price data.
///
/// Every failure is terminal for the call that raised it: the client makes a
/// single attempt and never retries.
#[derive(Error, Debug, Clone)]
pub enum MarketDataError {
    /// The request never produced a successful HTTP response
    /// (connection failure, timeout, or non-2xx status).
    #[error("Transport error: {provider} - {message}")]
    Transport {
        /// The provider that was being called
        provider: String,
        /// Description of the failure
        message: String,
    },

    /// The vendor rejected the symbol, or the payload lacked the expected
    /// time series. Unknown tickers and malformed payloads both land here.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// The vendor signalled throttling.
    #[error("Rate limited: {provider} - {message}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
        /// The vendor notice, when one was supplied
        message: String,
    },

    /// A price table violated its invariants (e.g. duplicate dates).
    #[error("Malformed price table: {0}")]
    MalformedTable(String),

    /// The client could not be constructed (missing API key, bad base URL).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MarketDataError {
    pub(crate) fn transport(provider: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn rate_limited(provider: &str, message: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
