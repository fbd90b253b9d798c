use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use marketscope_rust_core::models::{MarketInfo, MarketKind, MarketSummary, Orderbook, Trade};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_ORDERBOOK_DEPTH: usize = 20;
const MAX_ORDERBOOK_DEPTH: usize = 100;
const DEFAULT_TRADE_LIMIT: usize = 50;
const MAX_TRADE_LIMIT: usize = 500;

#[derive(Deserialize)]
pub struct ListMarketsParams {
    market_type: Option<String>,
}

/// All markets, optionally filtered by `market_type=spot|derivative`.
pub async fn list_markets(
    State(state): State<AppState>,
    Query(params): Query<ListMarketsParams>,
) -> Result<Json<Vec<MarketInfo>>, ApiError> {
    let kind = match params.market_type.as_deref() {
        None => None,
        Some(raw) => Some(MarketKind::parse(raw).ok_or_else(|| {
            ApiError::BadRequest("market_type must be 'spot' or 'derivative'".to_string())
        })?),
    };

    let markets = state.gateway.list_markets_of_kind(kind).await?;
    Ok(Json(markets))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(market_id): Path<String>,
) -> Result<Json<MarketSummary>, ApiError> {
    let summary = state
        .gateway
        .market_summary(&market_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Market {} not found", market_id)))?;
    Ok(Json(summary))
}

#[derive(Deserialize)]
pub struct OrderbookParams {
    depth: Option<usize>,
}

/// Orderbook snapshot, trimmed to `depth` levels per side (default 20,
/// maximum 100).
pub async fn get_orderbook(
    State(state): State<AppState>,
    Path(market_id): Path<String>,
    Query(params): Query<OrderbookParams>,
) -> Result<Json<Orderbook>, ApiError> {
    let depth = params.depth.unwrap_or(DEFAULT_ORDERBOOK_DEPTH);
    if depth < 1 || depth > MAX_ORDERBOOK_DEPTH {
        return Err(ApiError::BadRequest(format!(
            "depth must be between 1 and {}",
            MAX_ORDERBOOK_DEPTH
        )));
    }

    let mut book = state
        .gateway
        .orderbook(&market_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Orderbook for {} not found", market_id)))?;

    book.bids.truncate(depth);
    book.asks.truncate(depth);
    Ok(Json(book))
}

#[derive(Deserialize)]
pub struct TradesParams {
    limit: Option<usize>,
}

/// Recent trades, newest first (default 50, maximum 500).
pub async fn get_trades(
    State(state): State<AppState>,
    Path(market_id): Path<String>,
    Query(params): Query<TradesParams>,
) -> Result<Json<Vec<Trade>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_TRADE_LIMIT);
    if limit < 1 || limit > MAX_TRADE_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_TRADE_LIMIT
        )));
    }

    let trades = state.gateway.recent_trades(&market_id, limit).await?;
    Ok(Json(trades))
}
