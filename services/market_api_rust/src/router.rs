use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{compare, health, markets, metrics};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/markets", get(markets::list_markets))
        .route("/markets/:market_id/summary", get(markets::get_summary))
        .route("/markets/:market_id/orderbook", get(markets::get_orderbook))
        .route("/markets/:market_id/trades", get(markets::get_trades))
        .route("/metrics/trending/markets", get(metrics::get_trending))
        .route("/metrics/:market_id", get(metrics::get_metrics))
        .route("/metrics/:market_id/signals", get(metrics::get_signals))
        .route("/compare", get(compare::compare_markets));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/cache/clear", post(health::clear_cache))
        .nest("/api/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
