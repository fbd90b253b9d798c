use axum::extract::{RawQuery, State};
use axum::Json;

use marketscope_rust_core::analytics;
use marketscope_rust_core::models::MarketComparison;

use crate::error::ApiError;
use crate::state::AppState;

/// Collect every `market_ids=` occurrence from the raw query string. The
/// parameter repeats (`?market_ids=a&market_ids=b`), which the form-style
/// `Query` extractor cannot represent as a list.
fn parse_market_ids(query: Option<&str>) -> Vec<String> {
    query
        .unwrap_or("")
        .split('&')
        .filter_map(|pair| pair.strip_prefix("market_ids="))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Compare 2-10 markets side by side.
pub async fn compare_markets(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<MarketComparison>, ApiError> {
    let market_ids = parse_market_ids(query.as_deref());
    let comparison = analytics::compare_markets(&state.gateway, &market_ids).await?;
    Ok(Json(comparison))
}
