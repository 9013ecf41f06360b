use std::collections::HashMap;
use log::{debug, info};

use crate::core::edge::ExchangeEdge;
use crate::core::exchange_graph::ConversionGraph;
use crate::core::types::{Market, Ticker};
use crate::error::{DeciderError, DeciderResult};

/// 把交易所行情注册进图：每个交易对生成正向 (ask) 和反向 (1/bid) 两条边
///
/// 买价或卖价为零/缺失的交易对会被跳过。返回新增边数。
pub fn add_quotes_to_graph(
    tickers: &[Ticker],
    markets: &[Market],
    graph: &mut ConversionGraph,
) -> DeciderResult<usize> {
    let market_by_symbol: HashMap<&str, &Market> = markets
        .iter()
        .map(|market| (market.symbol.as_str(), market))
        .collect();

    let mut edge_count = 0;
    let mut skipped = 0;
    for ticker in tickers {
        if !ticker.is_priced() {
            debug!("跳过零价格交易对 {}", ticker.symbol);
            skipped += 1;
            continue;
        }

        let assets: Vec<&str> = ticker.symbol.split('/').collect();
        if assets.len() != 2 || assets.iter().any(|asset| asset.is_empty()) {
            return Err(DeciderError::data(format!(
                "Symbol {} should be XXX/YYY",
                ticker.symbol
            )));
        }

        let market = market_by_symbol.get(ticker.symbol.as_str()).ok_or_else(|| {
            DeciderError::data(format!("No market metadata for symbol {}", ticker.symbol))
        })?;

        graph.add(ExchangeEdge::new(ticker, market, true)?)?;
        graph.add(ExchangeEdge::new(ticker, market, false)?)?;
        edge_count += 2;
    }

    info!(
        "行情注册完成: {} 个交易对, 新增 {} 条边, 跳过 {} 个",
        tickers.len(),
        edge_count,
        skipped
    );
    Ok(edge_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::edge::ConversionRate;
    use crate::core::types::Node;

    #[test]
    fn test_adds_direct_and_reverse_edges() {
        let tickers = vec![
            Ticker::new("ETH/BTC", 0.0525, 0.0526),
            Ticker::new("BTC/RUB", 1_168_000.0, 1_168_501.0),
        ];
        let markets = vec![Market::new("ETH", "BTC", 0.001), Market::new("BTC", "RUB", 0.001)];

        let mut graph = ConversionGraph::new();
        let added = add_quotes_to_graph(&tickers, &markets, &mut graph).unwrap();
        assert_eq!(added, 4);
        assert_eq!(graph.get_stats(), (3, 4));

        let paths = graph.paths("ETH", "RUB", 2);
        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert_eq!(
            path.edges()[0].reference_url().as_deref(),
            Some("https://www.binance.com/ru/trade/ETH_BTC?type=spot")
        );
        assert_eq!(
            path.edges()[1].reference_url().as_deref(),
            Some("https://www.binance.com/ru/trade/BTC_RUB?type=spot")
        );
        assert_eq!(path.target(), Some(&Node::asset("RUB")));
    }

    #[test]
    fn test_skips_zero_prices() {
        let tickers = vec![
            Ticker { symbol: "DEAD/USDT".to_string(), bid: Some(0.0), ask: Some(0.0) },
            Ticker { symbol: "GONE/USDT".to_string(), bid: None, ask: None },
        ];
        let mut graph = ConversionGraph::new();
        assert_eq!(add_quotes_to_graph(&tickers, &[], &mut graph).unwrap(), 0);
        assert_eq!(graph.get_stats(), (0, 0));
    }

    #[test]
    fn test_rejects_malformed_symbol_and_missing_market() {
        let mut graph = ConversionGraph::new();
        let bad_symbol = vec![Ticker::new("ETHUSDT", 1.0, 1.0)];
        assert!(matches!(
            add_quotes_to_graph(&bad_symbol, &[], &mut graph),
            Err(DeciderError::Data(_))
        ));

        let no_market = vec![Ticker::new("ETH/USDT", 1.0, 1.0)];
        assert!(matches!(
            add_quotes_to_graph(&no_market, &[], &mut graph),
            Err(DeciderError::Data(_))
        ));
    }
}
