use std::sync::Arc;

use crate::{
    api::market_data::FetchParams,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use volcast_core::{
    analysis::{AnalysisRequest, VolatilityReport, VolatilityServiceTrait},
    constants::{
        DEFAULT_HORIZON_DAYS, DEFAULT_RETURNS_LIMIT, DEFAULT_TEST_FRACTION, MAX_HORIZON_DAYS,
    },
    returns::ReturnSeries,
    volatility::{ForecastMapping, WalkForwardPoint},
};

fn validate_horizon(horizon: usize) -> ApiResult<usize> {
    if (1..=MAX_HORIZON_DAYS).contains(&horizon) {
        Ok(horizon)
    } else {
        Err(ApiError::BadRequest(format!(
            "horizon must be between 1 and {}, got {}",
            MAX_HORIZON_DAYS, horizon
        )))
    }
}

fn validate_test_fraction(fraction: f64) -> ApiResult<f64> {
    if fraction > 0.0 && fraction < 1.0 {
        Ok(fraction)
    } else {
        Err(ApiError::BadRequest(format!(
            "test_fraction must be within (0, 1), got {}",
            fraction
        )))
    }
}

#[derive(Debug, Deserialize)]
struct VolatilityParams {
    outputsize: Option<String>,
    limit: Option<usize>,
    horizon: Option<usize>,
    #[serde(default)]
    annualized: bool,
}

async fn get_volatility(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(params): Query<VolatilityParams>,
) -> ApiResult<Json<VolatilityReport>> {
    let horizon = validate_horizon(params.horizon.unwrap_or(DEFAULT_HORIZON_DAYS))?;
    let fetch = FetchParams {
        outputsize: params.outputsize,
        limit: params.limit,
    };

    let request = AnalysisRequest::new(ticker)
        .output_size(fetch.output_size()?)
        .row_limit(fetch.limit)
        .horizon_days(horizon)
        .annualized(params.annualized);

    let report = state.volatility_service.analyze(request).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
struct ForecastBody {
    returns: ReturnSeries,
    #[serde(default = "default_horizon")]
    horizon: usize,
    #[serde(default)]
    annualized: bool,
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON_DAYS
}

async fn forecast_returns(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ForecastBody>, JsonRejection>,
) -> ApiResult<Json<ForecastMapping>> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let horizon = validate_horizon(body.horizon)?;

    let mapping = state
        .volatility_service
        .forecast_volatility(body.returns, horizon)
        .await?;

    Ok(Json(if body.annualized {
        mapping.annualized()
    } else {
        mapping
    }))
}

#[derive(Debug, Deserialize)]
struct WalkForwardParams {
    outputsize: Option<String>,
    limit: Option<usize>,
    test_fraction: Option<f64>,
}

async fn get_walk_forward(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(params): Query<WalkForwardParams>,
) -> ApiResult<Json<Vec<WalkForwardPoint>>> {
    let test_fraction =
        validate_test_fraction(params.test_fraction.unwrap_or(DEFAULT_TEST_FRACTION))?;
    let fetch = FetchParams {
        outputsize: params.outputsize,
        limit: params.limit,
    };
    let service = &state.volatility_service;

    let table = service
        .fetch_prices(&ticker, fetch.output_size()?, fetch.limit)
        .await?;
    let returns = service.extract_returns(&table, DEFAULT_RETURNS_LIMIT)?;
    let points = service.walk_forward(returns, test_fraction).await?;
    Ok(Json(points))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/volatility/forecast", post(forecast_returns))
        .route("/volatility/{ticker}", get(get_volatility))
        .route("/volatility/{ticker}/walk-forward", get(get_walk_forward))
}
