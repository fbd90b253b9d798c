// Shared models for Marketscope services
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Market Kind
// ============================================================================

/// Upstream market kind. The ledger exposes two distinct query schemas,
/// one per kind; the gateway unifies them into the types below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    Spot,
    Derivative,
}

impl MarketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketKind::Spot => "spot",
            MarketKind::Derivative => "derivative",
        }
    }

    /// Parse a query-string filter value ("spot" / "derivative").
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spot" => Some(MarketKind::Spot),
            "derivative" => Some(MarketKind::Derivative),
            _ => None,
        }
    }
}

impl std::fmt::Display for MarketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Canonical Market Entities
// ============================================================================

/// Basic market identity. Oracle fields are only populated for
/// derivative markets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInfo {
    pub market_id: String,
    pub ticker: String,
    pub base_denom: String,
    pub quote_denom: String,
    #[serde(rename = "type")]
    pub kind: MarketKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_quote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_type: Option<String>,
}

/// Point-in-time market summary.
///
/// `volume_24h` and `price_change_24h` are always 0.0: the upstream query
/// service exposes no historical aggregation, and computing them would need
/// a time-series store that is out of scope. Consumers rely on the zero
/// contract, so it is carried forward as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub market_id: String,
    pub ticker: String,
    #[serde(rename = "type")]
    pub kind: MarketKind,
    pub last_price: f64,
    pub volume_24h: f64,
    pub price_change_24h: f64,
    /// Set at fetch time, not at upstream data time.
    pub timestamp: DateTime<Utc>,
}

/// Single price level of an orderbook side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderbookLevel {
    pub price: f64,
    pub quantity: f64,
}

/// Orderbook snapshot. Bids are best (highest) first, asks best (lowest)
/// first, each side capped at [`crate::sources::MAX_ORDERBOOK_LEVELS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orderbook {
    pub market_id: String,
    #[serde(rename = "type")]
    pub kind: MarketKind,
    pub bids: Vec<OrderbookLevel>,
    pub asks: Vec<OrderbookLevel>,
    pub timestamp: DateTime<Utc>,
}

impl Orderbook {
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price)
    }
}

/// Single executed trade. `timestamp` is the upstream-supplied execution
/// time, passed through untouched; `side` is the execution side for
/// derivative trades and the trade direction for spot trades ("unknown"
/// when upstream omits it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub price: f64,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub side: String,
}

// ============================================================================
// Derived Analytics
// ============================================================================

/// Derived market metrics computed over gateway output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMetrics {
    pub market_id: String,
    pub ticker: String,
    /// Standard deviation of recent trade prices.
    pub volatility: f64,
    /// Bid-ask spread as a percentage of the best ask.
    pub spread_percentage: f64,
    /// Orderbook depth score, 0-100.
    pub liquidity_score: f64,
    /// "increasing", "decreasing", or "stable".
    pub volume_trend: String,
    /// "bullish", "bearish", or "neutral".
    pub price_momentum: String,
    pub timestamp: DateTime<Utc>,
}

/// Trading signal derived from summary, orderbook, and trade data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSignal {
    pub market_id: String,
    pub ticker: String,
    /// "buy", "sell", or "hold".
    pub signal: String,
    /// Signal strength, 0-100.
    pub strength: f64,
    pub indicators: SignalIndicators,
    pub timestamp: DateTime<Utc>,
}

/// Individual indicator values backing a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalIndicators {
    pub price_change_24h: f64,
    pub volume_24h: f64,
    pub spread: f64,
    pub volatility: f64,
}

/// One entry of the trending-markets ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingMarket {
    pub market_id: String,
    pub ticker: String,
    #[serde(rename = "type")]
    pub kind: MarketKind,
    pub price_change_24h: f64,
    pub volume_24h: f64,
    pub rank: usize,
}

/// Comparison across 2-10 markets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketComparison {
    pub markets: Vec<String>,
    pub best_performer: String,
    pub worst_performer: String,
    pub average_volume: f64,
    pub average_price_change: f64,
    pub data: Vec<MarketSummary>,
    pub timestamp: DateTime<Utc>,
}

/// Health report for the API surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub network: String,
    pub timestamp: DateTime<Utc>,
    pub cache_size: usize,
}
