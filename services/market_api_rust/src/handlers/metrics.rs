use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use marketscope_rust_core::analytics;
use marketscope_rust_core::models::{MarketMetrics, MarketSignal, TrendingMarket};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_TRENDING_LIMIT: usize = 10;
const MAX_TRENDING_LIMIT: usize = 50;

pub async fn get_metrics(
    State(state): State<AppState>,
    Path(market_id): Path<String>,
) -> Result<Json<MarketMetrics>, ApiError> {
    let metrics = analytics::market_metrics(&state.gateway, &market_id).await?;
    Ok(Json(metrics))
}

pub async fn get_signals(
    State(state): State<AppState>,
    Path(market_id): Path<String>,
) -> Result<Json<MarketSignal>, ApiError> {
    let signal = analytics::market_signal(&state.gateway, &market_id).await?;
    Ok(Json(signal))
}

#[derive(Deserialize)]
pub struct TrendingParams {
    limit: Option<usize>,
}

/// Markets ranked by 24h volume (default 10, maximum 50).
pub async fn get_trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<Vec<TrendingMarket>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_TRENDING_LIMIT);
    if limit < 1 || limit > MAX_TRENDING_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_TRENDING_LIMIT
        )));
    }

    let trending = analytics::trending_markets(&state.gateway, limit).await?;
    Ok(Json(trending))
}
