//! Derived analytics over the gateway's normalized output.
//!
//! Simple arithmetic consumers of the gateway contract: volatility from
//! recent trade prices, spread and depth from the orderbook, trend labels
//! and signals from the summary. Because the upstream service reports no
//! historical aggregation, the 24h volume and price-change inputs are
//! always zero; the trend, momentum, and signal thresholds are kept anyway
//! so the formulas light up once upstream grows history.

use chrono::Utc;

use crate::error::{GatewayError, Result};
use crate::gateway::MarketGateway;
use crate::models::{
    MarketComparison, MarketMetrics, MarketSignal, Orderbook, SignalIndicators, Trade,
    TrendingMarket,
};

/// Trades sampled for volatility and signal computation.
const TRADE_SAMPLE: usize = 100;

/// Orderbook levels per side counted toward the liquidity score.
const DEPTH_LEVELS: usize = 10;

/// Quantity that maps to a liquidity score of 100.
const LIQUIDITY_SCALE: f64 = 1000.0;

/// Markets scanned when building the trending ranking.
const TRENDING_SCAN_LIMIT: usize = 50;

pub const COMPARE_MIN_MARKETS: usize = 2;
pub const COMPARE_MAX_MARKETS: usize = 10;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Sample standard deviation of positive trade prices; 0.0 with fewer
/// than two usable prices.
pub fn volatility(trades: &[Trade]) -> f64 {
    let prices: Vec<f64> = trades.iter().map(|t| t.price).filter(|p| *p > 0.0).collect();
    if prices.len() < 2 {
        return 0.0;
    }

    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    let variance =
        prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (prices.len() - 1) as f64;
    variance.sqrt()
}

/// Bid-ask spread as a percentage of the best ask, rounded to 4 decimals.
/// 0.0 when either side is empty or non-positive.
pub fn spread_percentage(book: &Orderbook) -> f64 {
    let (best_bid, best_ask) = match (book.best_bid(), book.best_ask()) {
        (Some(bid), Some(ask)) => (bid, ask),
        _ => return 0.0,
    };
    if best_bid <= 0.0 || best_ask <= 0.0 {
        return 0.0;
    }
    round_to((best_ask - best_bid) / best_ask * 100.0, 4)
}

/// Depth score on a 0-100 scale: summed quantity over the top ten levels
/// of both sides, scaled against [`LIQUIDITY_SCALE`].
pub fn liquidity_score(book: &Orderbook) -> f64 {
    let bid_volume: f64 = book.bids.iter().take(DEPTH_LEVELS).map(|l| l.quantity).sum();
    let ask_volume: f64 = book.asks.iter().take(DEPTH_LEVELS).map(|l| l.quantity).sum();
    round_to(((bid_volume + ask_volume) / LIQUIDITY_SCALE).min(100.0), 2)
}

fn volume_trend(volume_24h: f64) -> &'static str {
    if volume_24h > 1_000_000.0 {
        "increasing"
    } else if volume_24h < 100_000.0 {
        "decreasing"
    } else {
        "stable"
    }
}

fn price_momentum(price_change_24h: f64) -> &'static str {
    if price_change_24h > 5.0 {
        "bullish"
    } else if price_change_24h < -5.0 {
        "bearish"
    } else {
        "neutral"
    }
}

/// Derived metrics for one market. `NotFound` when neither kind resolves
/// the identifier.
pub async fn market_metrics(gateway: &MarketGateway, market_id: &str) -> Result<MarketMetrics> {
    let summary = gateway
        .market_summary(market_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("Market {} not found", market_id)))?;

    let book = gateway.orderbook(market_id).await?;
    let trades = gateway.recent_trades(market_id, TRADE_SAMPLE).await?;

    Ok(MarketMetrics {
        market_id: market_id.to_string(),
        ticker: summary.ticker,
        volatility: round_to(volatility(&trades), 4),
        spread_percentage: book.as_ref().map(spread_percentage).unwrap_or(0.0),
        liquidity_score: book.as_ref().map(liquidity_score).unwrap_or(0.0),
        volume_trend: volume_trend(summary.volume_24h).to_string(),
        price_momentum: price_momentum(summary.price_change_24h).to_string(),
        timestamp: Utc::now(),
    })
}

/// Buy/sell/hold signal for one market.
pub async fn market_signal(gateway: &MarketGateway, market_id: &str) -> Result<MarketSignal> {
    let summary = gateway
        .market_summary(market_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("Market {} not found", market_id)))?;

    let book = gateway.orderbook(market_id).await?;
    let trades = gateway.recent_trades(market_id, TRADE_SAMPLE).await?;

    let indicators = SignalIndicators {
        price_change_24h: summary.price_change_24h,
        volume_24h: summary.volume_24h,
        spread: book.as_ref().map(spread_percentage).unwrap_or(0.0),
        volatility: volatility(&trades),
    };

    let (signal, strength) = if indicators.price_change_24h > 10.0 && indicators.volume_24h > 500_000.0
    {
        ("buy", (70.0 + indicators.price_change_24h).min(100.0))
    } else if indicators.price_change_24h < -10.0 && indicators.volume_24h > 500_000.0 {
        ("sell", (70.0 + indicators.price_change_24h.abs()).min(100.0))
    } else {
        ("hold", 50.0)
    };

    Ok(MarketSignal {
        market_id: market_id.to_string(),
        ticker: summary.ticker,
        signal: signal.to_string(),
        strength: round_to(strength, 2),
        indicators,
        timestamp: Utc::now(),
    })
}

/// Top markets by 24h volume, ranked from 1. Markets whose summary cannot
/// be fetched or whose volume is zero are skipped.
pub async fn trending_markets(gateway: &MarketGateway, limit: usize) -> Result<Vec<TrendingMarket>> {
    let markets = gateway.list_markets().await?;

    let mut trending = Vec::new();
    for market in markets.iter().take(TRENDING_SCAN_LIMIT) {
        match gateway.market_summary(&market.market_id).await {
            Ok(Some(summary)) if summary.volume_24h > 0.0 => {
                trending.push(TrendingMarket {
                    market_id: market.market_id.clone(),
                    ticker: market.ticker.clone(),
                    kind: market.kind,
                    price_change_24h: summary.price_change_24h,
                    volume_24h: summary.volume_24h,
                    rank: 0,
                });
            }
            _ => {}
        }
    }

    trending.sort_by(|a, b| {
        b.volume_24h
            .partial_cmp(&a.volume_24h)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    trending.truncate(limit);
    for (i, market) in trending.iter_mut().enumerate() {
        market.rank = i + 1;
    }

    Ok(trending)
}

/// Compare 2-10 markets. Arity is validated before any upstream work;
/// identifiers that resolve to nothing are skipped, and `NotFound` is
/// returned only when none resolve.
pub async fn compare_markets(
    gateway: &MarketGateway,
    market_ids: &[String],
) -> Result<MarketComparison> {
    if market_ids.len() < COMPARE_MIN_MARKETS {
        return Err(GatewayError::InvalidInput(
            "At least 2 market IDs required for comparison".to_string(),
        ));
    }
    if market_ids.len() > COMPARE_MAX_MARKETS {
        return Err(GatewayError::InvalidInput(
            "Maximum 10 markets can be compared at once".to_string(),
        ));
    }

    let mut summaries = Vec::new();
    for market_id in market_ids {
        if let Some(summary) = gateway.market_summary(market_id).await? {
            summaries.push(summary);
        }
    }

    if summaries.is_empty() {
        return Err(GatewayError::NotFound("No valid markets found".to_string()));
    }

    let best = summaries
        .iter()
        .max_by(|a, b| {
            a.price_change_24h
                .partial_cmp(&b.price_change_24h)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap();
    let worst = summaries
        .iter()
        .min_by(|a, b| {
            a.price_change_24h
                .partial_cmp(&b.price_change_24h)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap();

    let count = summaries.len() as f64;
    let average_volume = summaries.iter().map(|s| s.volume_24h).sum::<f64>() / count;
    let average_price_change = summaries.iter().map(|s| s.price_change_24h).sum::<f64>() / count;

    Ok(MarketComparison {
        markets: market_ids.to_vec(),
        best_performer: format!("{} ({:+.2}%)", best.ticker, best.price_change_24h),
        worst_performer: format!("{} ({:+.2}%)", worst.ticker, worst.price_change_24h),
        average_volume: round_to(average_volume, 2),
        average_price_change: round_to(average_price_change, 2),
        data: summaries,
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::models::{MarketKind, MarketSummary, OrderbookLevel};
    use crate::sources::MarketDataSource;
    use anyhow::Result as AnyResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn trade(price: f64) -> Trade {
        Trade {
            price,
            quantity: 1.0,
            timestamp: None,
            side: "buy".to_string(),
        }
    }

    fn book(bids: &[(f64, f64)], asks: &[(f64, f64)]) -> Orderbook {
        Orderbook {
            market_id: "0xm".to_string(),
            kind: MarketKind::Spot,
            bids: bids.iter().map(|&(p, q)| OrderbookLevel { price: p, quantity: q }).collect(),
            asks: asks.iter().map(|&(p, q)| OrderbookLevel { price: p, quantity: q }).collect(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_volatility_of_constant_prices_is_zero() {
        let trades: Vec<Trade> = (0..10).map(|_| trade(50.0)).collect();
        assert_eq!(volatility(&trades), 0.0);
    }

    #[test]
    fn test_volatility_ignores_non_positive_prices() {
        let trades = vec![trade(0.0), trade(-1.0), trade(10.0)];
        // Only one usable price left.
        assert_eq!(volatility(&trades), 0.0);
    }

    #[test]
    fn test_volatility_sample_stdev() {
        let trades = vec![trade(10.0), trade(12.0), trade(14.0)];
        // Sample stdev of {10, 12, 14} = 2.
        assert!((volatility(&trades) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_spread_percentage() {
        let b = book(&[(99.0, 1.0)], &[(100.0, 1.0)]);
        assert_eq!(spread_percentage(&b), 1.0);
    }

    #[test]
    fn test_spread_zero_when_side_empty() {
        let b = book(&[], &[(100.0, 1.0)]);
        assert_eq!(spread_percentage(&b), 0.0);
    }

    #[test]
    fn test_liquidity_score_counts_top_ten_levels() {
        // Twelve bid levels of 100 each: only ten count, plus one ask level.
        let bids: Vec<(f64, f64)> = (0..12).map(|i| (100.0 - i as f64, 100.0)).collect();
        let b = book(&bids, &[(101.0, 50.0)]);
        // (10 * 100 + 50) / 1000 = 1.05
        assert_eq!(liquidity_score(&b), 1.05);
    }

    #[test]
    fn test_liquidity_score_caps_at_100() {
        let b = book(&[(1.0, 1_000_000.0)], &[]);
        assert_eq!(liquidity_score(&b), 100.0);
    }

    #[test]
    fn test_trend_and_momentum_labels() {
        assert_eq!(volume_trend(2_000_000.0), "increasing");
        assert_eq!(volume_trend(50_000.0), "decreasing");
        assert_eq!(volume_trend(500_000.0), "stable");
        assert_eq!(price_momentum(6.0), "bullish");
        assert_eq!(price_momentum(-6.0), "bearish");
        assert_eq!(price_momentum(0.0), "neutral");
    }

    /// Source that counts upstream calls and resolves a fixed summary set.
    struct CountingSource {
        calls: Arc<AtomicUsize>,
        known: Vec<&'static str>,
    }

    #[async_trait]
    impl MarketDataSource for CountingSource {
        fn kind(&self) -> MarketKind {
            MarketKind::Derivative
        }

        async fn list_markets(&self) -> AnyResult<Vec<crate::models::MarketInfo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn market_summary(&self, market_id: &str) -> AnyResult<Option<MarketSummary>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.known.contains(&market_id) {
                Ok(Some(MarketSummary {
                    market_id: market_id.to_string(),
                    ticker: format!("{}-PERP", market_id),
                    kind: MarketKind::Derivative,
                    last_price: 100.0,
                    volume_24h: 0.0,
                    price_change_24h: 0.0,
                    timestamp: Utc::now(),
                }))
            } else {
                Ok(None)
            }
        }

        async fn orderbook(&self, _market_id: &str) -> AnyResult<Option<Orderbook>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }

        async fn recent_trades(&self, _market_id: &str, _limit: usize) -> AnyResult<Vec<Trade>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn counting_gateway(known: Vec<&'static str>) -> (MarketGateway, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Arc::new(CountingSource {
            calls: calls.clone(),
            known,
        });
        let gateway = MarketGateway::with_sources(GatewayConfig::default(), vec![source]);
        (gateway, calls)
    }

    #[tokio::test]
    async fn test_compare_rejects_single_market_before_any_fetch() {
        let (gateway, calls) = counting_gateway(vec!["M1"]);
        let err = compare_markets(&gateway, &["M1".to_string()]).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_compare_rejects_eleven_markets_before_any_fetch() {
        let (gateway, calls) = counting_gateway(vec!["M1"]);
        let ids: Vec<String> = (0..11).map(|i| format!("M{}", i)).collect();
        let err = compare_markets(&gateway, &ids).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_compare_skips_unresolved_markets() {
        let (gateway, _) = counting_gateway(vec!["M1", "M2"]);
        let ids = vec!["M1".to_string(), "M2".to_string(), "M3".to_string()];
        let cmp = compare_markets(&gateway, &ids).await.unwrap();
        assert_eq!(cmp.data.len(), 2);
        assert_eq!(cmp.markets.len(), 3);
        assert_eq!(cmp.average_price_change, 0.0);
    }

    #[tokio::test]
    async fn test_compare_not_found_when_nothing_resolves() {
        let (gateway, _) = counting_gateway(vec![]);
        let ids = vec!["M1".to_string(), "M2".to_string()];
        let err = compare_markets(&gateway, &ids).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_metrics_not_found_for_unknown_market() {
        let (gateway, _) = counting_gateway(vec![]);
        let err = market_metrics(&gateway, "M404").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_signal_holds_on_zero_history() {
        let (gateway, _) = counting_gateway(vec!["M1"]);
        let signal = market_signal(&gateway, "M1").await.unwrap();
        assert_eq!(signal.signal, "hold");
        assert_eq!(signal.strength, 50.0);
        assert_eq!(signal.indicators.volume_24h, 0.0);
    }
}
