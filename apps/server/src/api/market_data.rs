use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use volcast_core::{
    analysis::VolatilityServiceTrait,
    constants::{DEFAULT_RETURNS_LIMIT, DEFAULT_ROLLING_WINDOW},
    returns::{ReturnSeries, ReturnStats, SeriesPoint},
};
use volcast_market_data::{OutputSize, PriceTable};

/// `outputsize` and `limit` as accepted by every fetching endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FetchParams {
    pub outputsize: Option<String>,
    /// Most recent price rows to keep.
    pub limit: Option<usize>,
}

impl FetchParams {
    pub(crate) fn output_size(&self) -> ApiResult<OutputSize> {
        match self.outputsize.as_deref() {
            None => Ok(OutputSize::default()),
            Some(raw) => raw
                .parse()
                .map_err(|e: volcast_market_data::MarketDataError| {
                    ApiError::BadRequest(e.to_string())
                }),
        }
    }
}

async fn get_prices(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(params): Query<FetchParams>,
) -> ApiResult<Json<PriceTable>> {
    let table = state
        .volatility_service
        .fetch_prices(&ticker, params.output_size()?, params.limit)
        .await?;
    Ok(Json(table))
}

#[derive(Debug, Deserialize)]
struct ReturnsParams {
    outputsize: Option<String>,
    limit: Option<usize>,
    window: Option<usize>,
}

impl ReturnsParams {
    fn fetch(&self) -> FetchParams {
        FetchParams {
            outputsize: self.outputsize.clone(),
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReturnsResponse {
    ticker: String,
    returns: ReturnSeries,
    stats: Option<ReturnStats>,
    rolling_window: usize,
    rolling_volatility: Vec<SeriesPoint>,
}

async fn get_returns(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(params): Query<ReturnsParams>,
) -> ApiResult<Json<ReturnsResponse>> {
    let window = params.window.unwrap_or(DEFAULT_ROLLING_WINDOW);
    let service = &state.volatility_service;

    let fetch = params.fetch();
    let table = service
        .fetch_prices(&ticker, fetch.output_size()?, fetch.limit)
        .await?;
    let returns = service.extract_returns(&table, DEFAULT_RETURNS_LIMIT)?;
    let rolling_volatility = returns.rolling_std(window)?;

    Ok(Json(ReturnsResponse {
        stats: returns.stats().ok(),
        ticker,
        returns,
        rolling_window: window,
        rolling_volatility,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/prices/{ticker}", get(get_prices))
        .route("/returns/{ticker}", get(get_returns))
}
