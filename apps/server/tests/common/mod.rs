#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use tower::ServiceExt;
use volcast_market_data::{MarketDataError, OutputSize, PriceBar, PriceSeriesProvider, PriceTable};
use volcast_server::{api::app_router, config::Config, AppState};

/// Price source answering every ticker with the same table or error.
pub struct StubProvider {
    result: Result<PriceTable, MarketDataError>,
}

impl StubProvider {
    pub fn table(table: PriceTable) -> Self {
        Self { result: Ok(table) }
    }

    pub fn error(error: MarketDataError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl PriceSeriesProvider for StubProvider {
    fn id(&self) -> &'static str {
        "STUB"
    }

    async fn fetch_daily(
        &self,
        _ticker: &str,
        _output_size: OutputSize,
        row_limit: Option<usize>,
    ) -> Result<PriceTable, MarketDataError> {
        let table = self.result.clone()?.sorted_descending();
        Ok(match row_limit {
            Some(n) if n > 0 => table.head(n),
            _ => table,
        })
    }
}

/// Percentage returns simulated from a GARCH(1,1) process.
pub fn garch_returns(n: usize, seed: u64) -> Vec<f64> {
    let (mu, omega, alpha, beta) = (0.03, 0.05, 0.08, 0.9);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sigma2: f64 = omega / (1.0 - alpha - beta);
    let mut eps2 = sigma2;

    (0..n)
        .map(|_| {
            sigma2 = omega + alpha * eps2 + beta * sigma2;
            let z: f64 = StandardNormal.sample(&mut rng);
            let eps = sigma2.sqrt() * z;
            eps2 = eps * eps;
            mu + eps
        })
        .collect()
}

/// Newest-first table of `rows` daily closes compounding [`garch_returns`].
pub fn garch_prices(rows: usize, seed: u64) -> PriceTable {
    let mut close = 150.0;
    let mut date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

    let mut bars = Vec::with_capacity(rows);
    for r in garch_returns(rows, seed) {
        bars.push(PriceBar::new(date, close, close * 1.01, close * 0.99, close, 1e6));
        close *= 1.0 + r / 100.0;
        date = date.succ_opt().unwrap();
    }
    bars.reverse();
    PriceTable::new(bars).unwrap()
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "ALPHA_API_KEY" => Some("test-key".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn app(provider: StubProvider) -> Router {
    let state = AppState::with_provider(Arc::new(provider));
    app_router(state, &test_config())
}

pub async fn send(app: Router, request: Request<Body>) -> (u16, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn get(app: Router, uri: &str) -> (u16, serde_json::Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (u16, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
