//! Spot-schema source.
//!
//! Spot markets carry real base/quote denoms and no oracle; trades nest
//! price and quantity under a `price` object and report a trade direction
//! instead of an execution side.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::{MarketDataSource, MAX_ORDERBOOK_LEVELS};
use crate::clients::ChainQuery;
use crate::models::{MarketInfo, MarketKind, MarketSummary, Orderbook, OrderbookLevel, Trade};
use crate::scale::{decode_price, decode_quantity};

pub struct SpotSource {
    client: Arc<dyn ChainQuery>,
}

impl SpotSource {
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
impl MarketDataSource for SpotSource {
    fn kind(&self) -> MarketKind {
        MarketKind::Spot
    }

    async fn list_markets(&self) -> Result<Vec<MarketInfo>> {
        let result = self.client.spot_markets().await?;

        let mut markets = Vec::new();
        if let Some(items) = result["markets"].as_array() {
            for item in items {
                let market = &item["market"];
                if market.is_object() {
                    markets.push(MarketInfo {
                        market_id: market["marketId"].as_str().unwrap_or_default().to_string(),
                        ticker: market["ticker"].as_str().unwrap_or_default().to_string(),
                        base_denom: market["baseDenom"].as_str().unwrap_or_default().to_string(),
                        quote_denom: market["quoteDenom"].as_str().unwrap_or_default().to_string(),
                        kind: MarketKind::Spot,
                        oracle_base: None,
                        oracle_quote: None,
                        oracle_type: None,
                    });
                }
            }
        }
        Ok(markets)
    }

    async fn market_summary(&self, market_id: &str) -> Result<Option<MarketSummary>> {
        let result = self.client.spot_market(market_id).await?;

        let market = &result["market"];
        if !market.is_object() {
            return Ok(None);
        }

        // Spot markets have no mark price; the top-of-book mid is the only
        // last-price proxy available.
        let mid_price = result["midPriceAndTob"]["midPrice"]
            .as_str()
            .map(decode_price)
            .unwrap_or(0.0);

        Ok(Some(MarketSummary {
            market_id: market_id.to_string(),
            ticker: market["ticker"].as_str().unwrap_or_default().to_string(),
            kind: MarketKind::Spot,
            last_price: mid_price,
            volume_24h: 0.0,
            price_change_24h: 0.0,
            timestamp: Utc::now(),
        }))
    }

    async fn orderbook(&self, market_id: &str) -> Result<Option<Orderbook>> {
        let result = self.client.spot_orderbook(market_id).await?;

        let book = &result["orderbook"];
        if !book.is_object() {
            return Ok(None);
        }

        Ok(Some(Orderbook {
            market_id: market_id.to_string(),
            kind: MarketKind::Spot,
            bids: parse_side(book, "buys"),
            asks: parse_side(book, "sells"),
            timestamp: Utc::now(),
        }))
    }

    async fn recent_trades(&self, market_id: &str, limit: usize) -> Result<Vec<Trade>> {
        let result = self.client.spot_trades(market_id).await?;

        let mut trades = Vec::new();
        if let Some(items) = result["trades"].as_array() {
            for trade in items.iter().take(limit) {
                let price = &trade["price"];
                trades.push(Trade {
                    price: decode_price(price["price"].as_str().unwrap_or("0")),
                    quantity: decode_quantity(price["quantity"].as_str().unwrap_or("0")),
                    timestamp: trade["executedAt"].as_str().map(String::from),
                    side: trade["tradeDirection"]
                        .as_str()
                        .unwrap_or("unknown")
                        .to_string(),
                });
            }
        }
        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;

    struct StubChain {
        payload: Value,
    }

    #[async_trait]
    impl ChainQuery for StubChain {
        async fn derivative_markets(&self) -> Result<Value> {
            Err(anyhow!("unused"))
        }
        async fn spot_markets(&self) -> Result<Value> {
            Ok(self.payload.clone())
        }
        async fn derivative_market(&self, _market_id: &str) -> Result<Value> {
            Err(anyhow!("unused"))
        }
        async fn spot_market(&self, _market_id: &str) -> Result<Value> {
            Ok(self.payload.clone())
        }
        async fn derivative_orderbook(&self, _market_id: &str) -> Result<Value> {
            Err(anyhow!("unused"))
        }
        async fn spot_orderbook(&self, _market_id: &str) -> Result<Value> {
            Ok(self.payload.clone())
        }
        async fn derivative_trades(&self, _market_id: &str) -> Result<Value> {
            Err(anyhow!("unused"))
        }
        async fn spot_trades(&self, _market_id: &str) -> Result<Value> {
            Ok(self.payload.clone())
        }
    }

    fn source(payload: Value) -> SpotSource {
        SpotSource::new(Arc::new(StubChain { payload }))
    }

    #[tokio::test]
    async fn test_list_markets_uses_real_denoms() {
        let src = source(json!({
            "markets": [
                {"market": {
                    "marketId": "0xs1",
                    "ticker": "INJ/USDT",
                    "baseDenom": "inj",
                    "quoteDenom": "peggy0xusdt"
                }}
            ]
        }));

        let markets = src.list_markets().await.unwrap();
        assert_eq!(markets.len(), 1);
        let m = &markets[0];
        assert_eq!(m.kind, MarketKind::Spot);
        assert_eq!(m.base_denom, "inj");
        assert_eq!(m.quote_denom, "peggy0xusdt");
        assert!(m.oracle_base.is_none());
    }

    #[tokio::test]
    async fn test_summary_defaults_to_zero_without_tob() {
        let src = source(json!({"market": {"ticker": "INJ/USDT"}}));

        let summary = src.market_summary("0xs1").await.unwrap().unwrap();
        assert_eq!(summary.last_price, 0.0);
        assert_eq!(summary.kind, MarketKind::Spot);
    }

    #[tokio::test]
    async fn test_summary_uses_mid_price() {
        let src = source(json!({
            "market": {"ticker": "INJ/USDT"},
            "midPriceAndTob": {"midPrice": "21500000"}
        }));

        let summary = src.market_summary("0xs1").await.unwrap().unwrap();
        assert_eq!(summary.last_price, 21.5);
    }

    #[tokio::test]
    async fn test_missing_orderbook_is_none() {
        let src = source(json!({}));
        assert!(src.orderbook("0xs1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_trades_parse_nested_price_object() {
        let src = source(json!({
            "trades": [
                {
                    "price": {"price": "21500000", "quantity": "3000000000000000000"},
                    "executedAt": "1700000000000",
                    "tradeDirection": "buy"
                },
                {"price": {}}
            ]
        }));

        let trades = src.recent_trades("0xs1", 10).await.unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].price, 21.5);
        assert_eq!(trades[0].quantity, 3.0);
        assert_eq!(trades[0].side, "buy");
        assert_eq!(trades[1].side, "unknown");
    }

    #[tokio::test]
    async fn test_empty_trades_payload_yields_empty_vec() {
        let src = source(json!({"trades": []}));
        assert!(src.recent_trades("0xs1", 10).await.unwrap().is_empty());
    }
}
