use log::info;

use crate::core::edge::P2pEdge;
use crate::core::exchange_graph::ConversionGraph;
use crate::core::types::{C2cOffer, TradeType};
use crate::error::DeciderResult;
use crate::providers::OfferSource;

/// 把一组 C2C 报价注册为一条边
///
/// 报价需同方向、同法币、同资产。空列表不做任何事，返回 `Ok(false)`。
pub fn add_offers_to_graph(
    offers: &[C2cOffer],
    graph: &mut ConversionGraph,
    median_of_first_n: usize,
) -> DeciderResult<bool> {
    if offers.is_empty() {
        return Ok(false);
    }

    let edge = P2pEdge::from_offers(offers, median_of_first_n)?;
    graph.add(edge)?;
    Ok(true)
}

/// 为一次法币对查询加载 C2C 报价
///
/// 源法币取 BUY 报价（法币买入资产），目标法币取 SELL 报价（卖出资产换法币）。
/// 返回新增边数。
pub fn load_c2c_to_graph(
    source: &dyn OfferSource,
    fiat_from: &str,
    fiat_to: &str,
    graph: &mut ConversionGraph,
    median_of_first_n: usize,
) -> DeciderResult<usize> {
    let mut edge_count = 0;
    for (fiat, trade_type) in [(fiat_from, TradeType::Buy), (fiat_to, TradeType::Sell)] {
        let asset_offers = source.offers(fiat, trade_type)?;
        for (asset, offers) in &asset_offers {
            info!(
                "从 {} 加载 {} 条 P2P {} {} / {} 报价",
                source.name(),
                offers.len(),
                trade_type,
                fiat,
                asset
            );
            if add_offers_to_graph(offers, graph, median_of_first_n)? {
                edge_count += 1;
            }
        }
    }
    Ok(edge_count)
}
