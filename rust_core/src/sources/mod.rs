//! Per-kind market data sources.
//!
//! The two upstream schemas (derivative, spot) are unified by giving each
//! kind its own source implementing one common trait. The gateway walks its
//! source list in fixed precedence order (derivative first, then spot) and
//! stops at the first source that yields data, instead of duplicating the
//! try/fallback dance per operation.

pub mod derivative;
pub mod spot;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{MarketInfo, MarketKind, MarketSummary, Orderbook, Trade};

/// Levels kept per orderbook side before caching.
pub const MAX_ORDERBOOK_LEVELS: usize = 100;

/// One market kind's view of the upstream query service, normalized to the
/// canonical models.
///
/// Field extraction is defensive throughout: a missing nested field becomes
/// an empty string, 0.0, or "unknown" rather than failing the operation.
/// `Ok(None)` / an empty vec means "this kind has no data for the query";
/// `Err` means the upstream call itself failed. The gateway treats both as
/// reason to try the next source.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn kind(&self) -> MarketKind;

    async fn list_markets(&self) -> Result<Vec<MarketInfo>>;

    async fn market_summary(&self, market_id: &str) -> Result<Option<MarketSummary>>;

    async fn orderbook(&self, market_id: &str) -> Result<Option<Orderbook>>;

    async fn recent_trades(&self, market_id: &str, limit: usize) -> Result<Vec<Trade>>;
}

pub use derivative::DerivativeSource;
pub use spot::SpotSource;
