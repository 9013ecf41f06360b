use log::{debug, info};

use crate::config::SearchConfig;
use crate::core::conversion_chain::{materialize_all, ConversionPath};
use crate::core::exchange_graph::ConversionGraph;
use crate::core::types::fiat_code;
use crate::error::DeciderResult;
use crate::providers::{add_quotes_to_graph, load_c2c_to_graph, OfferSource, QuoteSource};

/// 一次法币兑换查询：建图 -> 枚举路径 -> 排序 -> 按金额展开
pub struct RouteFinder {
    max_hops: usize,
    median_of_first_n: usize,
    top: usize,
}

impl RouteFinder {
    pub fn new(search: &SearchConfig) -> Self {
        Self {
            max_hops: search.max_hops,
            median_of_first_n: search.median_of_first_n,
            top: search.top,
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    /// 每次调用都新建一个图，返回按评分排序的前 `top` 条路径
    pub fn find(
        &self,
        quotes: &dyn QuoteSource,
        offers: &dyn OfferSource,
        fiat_from: &str,
        fiat_to: &str,
        amount: f64,
    ) -> DeciderResult<Vec<ConversionPath>> {
        let mut graph = ConversionGraph::new();

        let tickers = quotes.tickers()?;
        let markets = quotes.markets()?;
        add_quotes_to_graph(&tickers, &markets, &mut graph)?;
        load_c2c_to_graph(offers, fiat_from, fiat_to, &mut graph, self.median_of_first_n)?;

        let (nodes, edges) = graph.get_stats();
        debug!("兑换图构建完成: {} 个节点, {} 条边", nodes, edges);

        let paths = graph.paths(&fiat_code(fiat_from), &fiat_code(fiat_to), self.max_hops);
        info!(
            "🔍 {} -> {} 找到 {} 条路径 (最多 {} 跳)",
            fiat_from,
            fiat_to,
            paths.len(),
            self.max_hops
        );

        let mut ranked = materialize_all(paths, amount)?;
        ranked.truncate(self.top);
        Ok(ranked)
    }
}
