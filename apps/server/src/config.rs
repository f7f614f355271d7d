use std::{net::SocketAddr, time::Duration};

use volcast_core::errors::{Error, Result};
use volcast_market_data::provider::alpha_vantage::DEFAULT_BASE_URL;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub alpha_api_key: String,
    pub alpha_vantage_url: String,
    /// Timeout for each call to the market-data vendor.
    pub upstream_timeout: Duration,
    /// Timeout for each inbound HTTP request.
    pub request_timeout: Duration,
    pub cors_allow: Vec<String>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let alpha_api_key = lookup("ALPHA_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Configuration("ALPHA_API_KEY is not set".to_string()))?;

        let listen_addr: SocketAddr = lookup("VC_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .map_err(|e| Error::Configuration(format!("Invalid VC_LISTEN_ADDR: {}", e)))?;

        let alpha_vantage_url =
            lookup("VC_ALPHA_VANTAGE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let upstream_timeout =
            parse_millis(&lookup, "VC_UPSTREAM_TIMEOUT_MS", DEFAULT_UPSTREAM_TIMEOUT_MS)?;
        let request_timeout =
            parse_millis(&lookup, "VC_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;

        let cors_allow = lookup("VC_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match lookup("VC_LOG_FORMAT") {
            None => LogFormat::Text,
            Some(v) if v.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(v) => {
                return Err(Error::Configuration(format!(
                    "Invalid VC_LOG_FORMAT '{}': expected 'text' or 'json'",
                    v
                )))
            }
        };

        Ok(Self {
            listen_addr,
            alpha_api_key,
            alpha_vantage_url,
            upstream_timeout,
            request_timeout,
            cors_allow,
            log_format,
        })
    }
}

fn parse_millis<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let ms = match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| Error::Configuration(format!("Invalid {}: {}", key, e)))?,
        None => default,
    };
    if ms == 0 {
        return Err(Error::Configuration(format!("{} must be positive", key)));
    }
    Ok(Duration::from_millis(ms))
}
