//! Core library for the Marketscope market data gateway.
//!
//! Normalizes Injective exchange market data behind a single read-through
//! gateway: fixed-point decoding, derivative/spot schema unification, TTL
//! caching, and derived analytics on top of the normalized output.

pub mod analytics;
pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod scale;
pub mod sources;

pub use config::{GatewayConfig, Network};
pub use error::{GatewayError, Result};
pub use gateway::MarketGateway;
pub use models::{
    HealthStatus, MarketComparison, MarketInfo, MarketKind, MarketMetrics, MarketSignal,
    MarketSummary, Orderbook, OrderbookLevel, Trade, TrendingMarket,
};
