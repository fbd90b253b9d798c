//! Derivative-schema source.
//!
//! Derivative market payloads carry oracle metadata and a `markPrice`;
//! trades nest their execution data under `positionDelta`.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::{MarketDataSource, MAX_ORDERBOOK_LEVELS};
use crate::clients::ChainQuery;
use crate::models::{MarketInfo, MarketKind, MarketSummary, Orderbook, OrderbookLevel, Trade};
use crate::scale::{decode_price, decode_quantity};

pub struct DerivativeSource {
    client: Arc<dyn ChainQuery>,
}

impl DerivativeSource {
    pub fn new(client: Arc<dyn ChainQuery>) -> Self {
        Self { client }
    }
}

fn parse_level(level: &Value) -> OrderbookLevel {
    OrderbookLevel {
        price: decode_price(level["price"].as_str().unwrap_or("0")),
        quantity: decode_quantity(level["quantity"].as_str().unwrap_or("0")),
    }
}

fn parse_side(book: &Value, side: &str) -> Vec<OrderbookLevel> {
    book[side]
        .as_array()
        .map(|levels| levels.iter().take(MAX_ORDERBOOK_LEVELS).map(parse_level).collect())
        .unwrap_or_default()
}

#[async_trait]
impl MarketDataSource for DerivativeSource {
    fn kind(&self) -> MarketKind {
        MarketKind::Derivative
    }

    async fn list_markets(&self) -> Result<Vec<MarketInfo>> {
        let result = self.client.derivative_markets().await?;

        let mut markets = Vec::new();
        if let Some(items) = result["markets"].as_array() {
            for item in items {
                let market = &item["market"];
                if market.is_object() {
                    // Derivative markets have no base denom of their own;
                    // upstream reports the quote denom for both roles.
                    let quote_denom = market["quoteDenom"].as_str().unwrap_or_default();
                    markets.push(MarketInfo {
                        market_id: market["marketId"].as_str().unwrap_or_default().to_string(),
                        ticker: market["ticker"].as_str().unwrap_or_default().to_string(),
                        base_denom: quote_denom.to_string(),
                        quote_denom: quote_denom.to_string(),
                        kind: MarketKind::Derivative,
                        oracle_base: market["oracleBase"].as_str().map(String::from),
                        oracle_quote: market["oracleQuote"].as_str().map(String::from),
                        oracle_type: market["oracleType"].as_str().map(String::from),
                    });
                }
            }
        }
        Ok(markets)
    }

    async fn market_summary(&self, market_id: &str) -> Result<Option<MarketSummary>> {
        let result = self.client.derivative_market(market_id).await?;

        let market = &result["market"];
        if !market.is_object() {
            return Ok(None);
        }

        let mark_price = result["markPrice"]
            .as_str()
            .map(decode_price)
            .unwrap_or(0.0);
        // Mid price from top-of-book is preferred over the oracle mark.
        let mid_price = result["midPriceAndTob"]["midPrice"]
            .as_str()
            .map(decode_price)
            .unwrap_or(mark_price);

        Ok(Some(MarketSummary {
            market_id: market_id.to_string(),
            ticker: market["ticker"].as_str().unwrap_or_default().to_string(),
            kind: MarketKind::Derivative,
            last_price: mid_price,
            volume_24h: 0.0,
            price_change_24h: 0.0,
            timestamp: Utc::now(),
        }))
    }

    async fn orderbook(&self, market_id: &str) -> Result<Option<Orderbook>> {
        let result = self.client.derivative_orderbook(market_id).await?;

        let book = &result["orderbook"];
        if !book.is_object() {
            return Ok(None);
        }

        Ok(Some(Orderbook {
            market_id: market_id.to_string(),
            kind: MarketKind::Derivative,
            bids: parse_side(book, "buys"),
            asks: parse_side(book, "sells"),
            timestamp: Utc::now(),
        }))
    }

    async fn recent_trades(&self, market_id: &str, limit: usize) -> Result<Vec<Trade>> {
        let result = self.client.derivative_trades(market_id).await?;

        let mut trades = Vec::new();
        if let Some(items) = result["trades"].as_array() {
            for trade in items.iter().take(limit) {
                let delta = &trade["positionDelta"];
                trades.push(Trade {
                    price: decode_price(delta["executionPrice"].as_str().unwrap_or("0")),
                    quantity: decode_quantity(delta["executionQuantity"].as_str().unwrap_or("0")),
                    timestamp: trade["executedAt"].as_str().map(String::from),
                    side: trade["executionSide"]
                        .as_str()
                        .unwrap_or("unknown")
                        .to_string(),
                });
            }
        }
        Ok(trades)
    }
}
