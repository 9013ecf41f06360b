use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rate_decider::config::SearchConfig;
use rate_decider::core::types::{C2cOffer, Market, Ticker, TradeType};
use rate_decider::core::{
    materialize, materialize_all, ordered_paths, ConversionGraph, ConversionRate, Edge, Node,
};
use rate_decider::providers::{add_offers_to_graph, add_quotes_to_graph, MarketSnapshot};
use rate_decider::utils::approx_eq;
use rate_decider::{DeciderError, RouteFinder};

const TOLERANCE: f64 = 1e-9;

/// ETH/USDT 单跳 + ETH/BTC/USDT 两跳
fn eth_usdt_graph(with_two_hop: bool) -> ConversionGraph {
    let mut tickers = vec![Ticker::new("ETH/USDT", 1095.0, 1096.0)];
    let mut markets = vec![Market::new("ETH", "USDT", 0.01)];
    if with_two_hop {
        tickers.push(Ticker::new("ETH/BTC", 0.0525, 0.0526));
        tickers.push(Ticker::new("BTC/USDT", 20229.0, 20230.0));
        markets.push(Market::new("ETH", "BTC", 0.01));
        markets.push(Market::new("BTC", "USDT", 0.1));
    }

    let mut graph = ConversionGraph::new();
    add_quotes_to_graph(&tickers, &markets, &mut graph).unwrap();
    graph
}

/// 集成测试：单跳交易所兑换
#[test]
fn test_single_hop_exchange_rate() {
    let graph = eth_usdt_graph(false);
    let paths = graph.paths("ETH", "USDT", 1);

    assert_eq!(paths.len(), 1);
    assert!(approx_eq(paths[0].rate(), 1085.04, TOLERANCE));
    assert!(approx_eq(paths[0].score(), 1085.04 * 0.98, TOLERANCE));
}

/// 集成测试：单跳与两跳竞争，单跳排在前面
#[test]
fn test_two_hop_competition() {
    let graph = eth_usdt_graph(true);
    let paths = graph.paths("ETH", "USDT", 2);
    assert_eq!(paths.len(), 2);

    let ranked = ordered_paths(paths);
    assert_eq!(ranked[0].len(), 1);
    assert!(approx_eq(ranked[0].rate(), 1085.04, TOLERANCE));
    assert_eq!(ranked[1].route_label(), "ETH-BTC-USDT");
    assert!(approx_eq(ranked[1].rate(), 948.111318, 1e-6));
    assert!(ranked[0].score() > ranked[1].score());
}

/// 集成测试：卖出报价生成资产 -> 法币边
#[test]
fn test_p2p_sell_offers() {
    let offers: Vec<C2cOffer> = ["456.50", "456.80", "456.88", "457.00", "999.00"]
        .iter()
        .map(|price| C2cOffer::new(TradeType::Sell, "USDT", "KZT", price))
        .collect();

    let mut graph = ConversionGraph::new();
    assert!(add_offers_to_graph(&offers, &mut graph, 4).unwrap());

    let edge = &graph.edges()[0];
    assert_eq!(edge.from_node(), &Node::asset("USDT"));
    assert_eq!(edge.to_node(), &Node::fiat("KZT"));
    assert!(approx_eq(edge.net_rate(), 1.0 / 456.84, TOLERANCE));
    assert_eq!(edge.commission(100.0), 0.0);
}

/// 集成测试：空报价列表不改变图
#[test]
fn test_empty_offers_noop() {
    let mut graph = eth_usdt_graph(false);
    let before = graph.get_stats();
    let nodes_before = graph.nodes().clone();

    assert!(!add_offers_to_graph(&[], &mut graph, 4).unwrap());
    assert_eq!(graph.get_stats(), before);
    assert_eq!(graph.nodes(), &nodes_before);
}

/// 集成测试：逐跳展开的金额衔接
#[test]
fn test_materialized_hops_chain_amounts() {
    let graph = eth_usdt_graph(true);
    let routes = materialize_all(graph.paths("ETH", "USDT", 2), 2.5).unwrap();
    assert_eq!(routes.len(), 2);

    for route in &routes {
        assert_eq!(route.source_amount, 2.5);
        assert_eq!(route.hops[0].from_amount, 2.5);
        for pair in route.hops.windows(2) {
            assert_eq!(pair[0].to_currency, pair[1].from_currency);
            assert_eq!(pair[0].to_amount, pair[1].from_amount);
        }
        let last = route.hops.last().unwrap();
        assert_eq!(last.to_amount, route.target_amount);
        assert!(approx_eq(route.target_amount / route.source_amount, route.rate, TOLERANCE));
    }

    // 两跳的第一跳：2.5 ETH 扣 1% 后按 0.0526 换 BTC
    let two_hop = &routes[1];
    assert!(approx_eq(two_hop.hops[0].commission, 0.025, TOLERANCE));
    assert!(approx_eq(two_hop.hops[0].to_amount, 2.475 * 0.0526, TOLERANCE));
}

/// 集成测试：非法金额被拒绝
#[test]
fn test_materialize_rejects_bad_amount() {
    let graph = eth_usdt_graph(false);
    let paths = graph.paths("ETH", "USDT", 1);
    for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            materialize(&paths[0], amount),
            Err(DeciderError::Validation(_))
        ));
    }
}

/// 集成测试：起点等于终点
#[test]
fn test_same_currency_boundary() {
    let graph = eth_usdt_graph(true);
    let paths = graph.paths("ETH", "ETH", 3);
    assert_eq!(paths.len(), 1);
    assert!(paths[0].is_empty());

    let route = materialize(&paths[0], 10.0).unwrap();
    assert_eq!(route.hop_count(), 0);
    assert_eq!(route.target_amount, 10.0);
    assert_eq!(route.target_currency, "ETH");

    assert!(graph.paths("ETH", "DOGE", 3).is_empty());
    assert!(graph.paths("DOGE", "ETH", 3).is_empty());
}

/// 集成测试：随机图上的连续性与确定性
#[test]
fn test_random_graph_properties() {
    let currencies = ["A", "B", "C", "D", "E", "F"];
    let mut rng = StdRng::seed_from_u64(42);
    let mut graph = ConversionGraph::new();
    for _ in 0..20 {
        let from = currencies[rng.gen_range(0..currencies.len())];
        let to = currencies[rng.gen_range(0..currencies.len())];
        if from == to {
            continue;
        }
        let price = rng.gen_range(0.1..10.0);
        let fee = rng.gen_range(0.0..0.05);
        graph.add(Edge::raw(Node::asset(from), Node::asset(to), price, fee)).unwrap();
    }

    for max_hops in 1..=4 {
        let first = graph.paths("A", "F", max_hops);
        let second = graph.paths("A", "F", max_hops);
        assert_eq!(first, second);

        for path in &first {
            assert!(path.len() <= max_hops);
            assert_eq!(path.source(), Some(&Node::asset("A")));
            assert_eq!(path.target(), Some(&Node::asset("F")));
            for pair in path.edges().windows(2) {
                assert_eq!(pair[0].to_node(), pair[1].from_node());
            }
            // 目标只出现在末尾
            for edge in &path.edges()[..path.len() - 1] {
                assert_ne!(edge.to_node(), &Node::asset("F"));
            }
        }

        let ranked = ordered_paths(first);
        for pair in ranked.windows(2) {
            assert!(pair[0].score() >= pair[1].score());
        }
    }
}

/// 集成测试：从快照到排名结果的完整流程
#[test]
fn test_finder_over_snapshot_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/snapshot.json");
    let snapshot = MarketSnapshot::load(path).unwrap();

    let finder = RouteFinder::new(&SearchConfig::default());
    let routes = finder.find(&snapshot, &snapshot, "KZT", "RUB", 10000.0).unwrap();

    // KZT->USDT, KZT->BTC 各自直达 RUB，以及经交易所 BTC/USDT 互换的两条三跳路径
    assert_eq!(routes.len(), 4);

    // BUY 中位价 0.0020385 USDT/KZT，SELL 中位价 0.012304 USDT/RUB
    let best = &routes[0];
    assert_eq!(best.route_label(), "KZT(f)-USDT-RUB(f)");
    assert!(approx_eq(best.hops[0].to_amount, 20.385, 1e-9));
    assert!(approx_eq(best.target_amount, 10000.0 * 0.0020385 / 0.012304, 1e-9));
    assert!(approx_eq(best.target_amount, 1656.77, 1e-5));

    for route in &routes {
        assert_eq!(route.source_currency, "KZT(f)");
        assert_eq!(route.target_currency, "RUB(f)");
        assert!(route.hop_count() <= 3);
    }
    for pair in routes.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}
