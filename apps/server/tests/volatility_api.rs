mod common;

use chrono::{Datelike, NaiveDate, Weekday};
use common::{app, garch_prices, garch_returns, get, post_json, StubProvider};
use serde_json::json;
use volcast_market_data::MarketDataError;

// =========================================================================
// prices / returns
// =========================================================================

#[tokio::test]
async fn prices_honor_limit() {
    let (status, body) = get(app(StubProvider::table(garch_prices(50, 3))), "/api/v1/prices/IBM?limit=5").await;
    assert_eq!(status, 200);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    for key in ["date", "open", "high", "low", "close", "volume"] {
        assert!(rows[0].get(key).is_some(), "missing {}", key);
    }
}

#[tokio::test]
async fn unknown_output_size_is_bad_request() {
    let (status, body) = get(
        app(StubProvider::table(garch_prices(50, 3))),
        "/api/v1/prices/IBM?outputsize=huge",
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn invalid_symbol_is_not_found() {
    let provider = StubProvider::error(MarketDataError::InvalidSymbol(
        "Invalid API call".to_string(),
    ));
    let (status, body) = get(app(provider), "/api/v1/prices/ZZZZ").await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn rate_limit_is_too_many_requests() {
    let provider = StubProvider::error(MarketDataError::RateLimited {
        provider: "ALPHA_VANTAGE".to_string(),
        message: "Thank you for using Alpha Vantage!".to_string(),
    });
    let (status, _) = get(app(provider), "/api/v1/volatility/IBM").await;
    assert_eq!(status, 429);
}

#[tokio::test]
async fn transport_failure_is_bad_gateway() {
    let provider = StubProvider::error(MarketDataError::Transport {
        provider: "ALPHA_VANTAGE".to_string(),
        message: "HTTP 503 Service Unavailable".to_string(),
    });
    let (status, _) = get(app(provider), "/api/v1/returns/IBM").await;
    assert_eq!(status, 502);
}

#[tokio::test]
async fn returns_include_stats_and_rolling_volatility() {
    let (status, body) = get(
        app(StubProvider::table(garch_prices(100, 5))),
        "/api/v1/returns/IBM?window=30",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["ticker"], "IBM");
    assert_eq!(body["returns"].as_array().unwrap().len(), 99);
    assert_eq!(body["stats"]["count"], 99);
    assert_eq!(body["rollingWindow"], 30);
    assert_eq!(body["rollingVolatility"].as_array().unwrap().len(), 70);
}

// =========================================================================
// volatility
// =========================================================================

#[tokio::test]
async fn volatility_report_has_requested_horizon() {
    let (status, body) = get(
        app(StubProvider::table(garch_prices(400, 7))),
        "/api/v1/volatility/IBM?horizon=5",
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["ticker"], "IBM");
    assert_eq!(body["unitLabel"], "Daily Volatility (% change per day)");
    assert_eq!(body["latestPrices"].as_array().unwrap().len(), 10);

    let forecast = body["forecast"].as_object().unwrap();
    assert_eq!(forecast.len(), 5);
    for (key, value) in forecast {
        let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").unwrap();
        assert!(!matches!(date.weekday(), Weekday::Sat | Weekday::Sun));
        assert!(value.as_f64().unwrap() >= 0.0);
    }
}

#[tokio::test]
async fn annualized_report_changes_label() {
    let (status, body) = get(
        app(StubProvider::table(garch_prices(400, 7))),
        "/api/v1/volatility/IBM?horizon=3&annualized=true",
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["annualized"], true);
    assert_eq!(body["unitLabel"], "Annualized Volatility (% change per year)");
}

#[tokio::test]
async fn horizon_out_of_range_is_bad_request() {
    for uri in [
        "/api/v1/volatility/IBM?horizon=0",
        "/api/v1/volatility/IBM?horizon=366",
    ] {
        let (status, _) = get(app(StubProvider::table(garch_prices(100, 9))), uri).await;
        assert_eq!(status, 400, "{}", uri);
    }
}

#[tokio::test]
async fn short_history_is_unprocessable() {
    for rows in [2, 3, 6] {
        let (status, body) = get(
            app(StubProvider::table(garch_prices(rows, 11))),
            "/api/v1/volatility/IBM",
        )
        .await;
        assert_eq!(status, 422, "{} rows", rows);
        assert_eq!(body["code"], 422);
    }
}

#[tokio::test]
async fn forecast_from_posted_returns() {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let values = garch_returns(300, 17);
    let returns: Vec<_> = values
        .iter()
        .enumerate()
        .map(|(i, v)| json!({ "date": start + chrono::Days::new(i as u64), "value": v }))
        .collect();
    let last = start + chrono::Days::new(299);

    let (status, body) = post_json(
        app(StubProvider::table(garch_prices(10, 1))),
        "/api/v1/volatility/forecast",
        json!({ "returns": returns, "horizon": 3, "annualized": true }),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    let forecast = body.as_object().unwrap();
    assert_eq!(forecast.len(), 3);
    let first = NaiveDate::parse_from_str(forecast.keys().next().unwrap(), "%Y-%m-%d").unwrap();
    assert!(first > last);
}

#[tokio::test]
async fn unordered_posted_returns_are_bad_request() {
    let (status, body) = post_json(
        app(StubProvider::table(garch_prices(10, 1))),
        "/api/v1/volatility/forecast",
        json!({
            "returns": [
                { "date": "2024-01-03", "value": 1.0 },
                { "date": "2024-01-02", "value": -1.0 }
            ],
            "horizon": 2
        }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn walk_forward_returns_trailing_points() {
    let (status, body) = get(
        app(StubProvider::table(garch_prices(300, 13))),
        "/api/v1/volatility/IBM/walk-forward?test_fraction=0.05",
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    let points = body.as_array().unwrap();
    // 299 returns, floor(0.05 * 299) = 14.
    assert_eq!(points.len(), 14);
    assert!(points[0].get("forecastVolatility").is_some());
    assert!(points[0].get("realizedReturn").is_some());
}

#[tokio::test]
async fn walk_forward_rejects_bad_fraction() {
    let (status, _) = get(
        app(StubProvider::table(garch_prices(100, 13))),
        "/api/v1/volatility/IBM/walk-forward?test_fraction=1.5",
    )
    .await;
    assert_eq!(status, 400);
}
