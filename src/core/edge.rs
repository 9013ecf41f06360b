use bigdecimal::BigDecimal;
use log::debug;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::types::{C2cOffer, Market, Node, Ticker, TradeType};
use crate::error::{DeciderError, DeciderResult};
use crate::utils::{bigdecimal_to_f64, median_of_first, str_to_bigdecimal};

/// C2C 边默认取前 N 条报价的中位价
pub const DEFAULT_MEDIAN_OF_FIRST_N: usize = 4;

const EXCHANGE_TRADE_URL: &str = "https://www.binance.com/ru/trade";
const C2C_TRADE_URL: &str = "https://c2c.binance.com/ru/trade";

/// 兑换边的统一能力：1（或 N）单位 from 能换多少 to
///
/// 手续费的约定因实现而异：
/// - `RawEdge` 把手续费折算进 `convert`，`commission` 恒为 0；
/// - `ExchangeEdge` 的 `convert` 是毛额，`commission` 单独给出（以源币计）；
/// - `P2pEdge` 的报价已含费用，`commission` 恒为 0。
pub trait ConversionRate {
    fn from_node(&self) -> &Node;

    fn to_node(&self) -> &Node;

    /// 将 `amount` 单位源币兑换为目标币（毛额）
    fn convert(&self, amount: f64) -> f64;

    /// 兑换 `amount` 单位源币收取的手续费，以源币计
    fn commission(&self, amount: f64) -> f64;

    /// 支撑该汇率的市场/报价页面
    fn reference_url(&self) -> Option<String>;

    /// 扣除手续费后实际到手的目标币数量
    fn net_converted(&self, amount: f64) -> f64 {
        self.convert(amount - self.commission(amount))
    }

    /// 每单位源币的净汇率
    fn net_rate(&self) -> f64 {
        self.net_converted(1.0)
    }
}

/// 显式给定价格和费率的边
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEdge {
    pub from: Node,
    pub to: Node,
    pub price: f64,
    pub fee: f64,               // 费率，已折算进 convert
}

impl RawEdge {
    pub fn new(from: Node, to: Node, price: f64, fee: f64) -> Self {
        Self { from, to, price, fee }
    }
}

impl ConversionRate for RawEdge {
    fn from_node(&self) -> &Node {
        &self.from
    }

    fn to_node(&self) -> &Node {
        &self.to
    }

    fn convert(&self, amount: f64) -> f64 {
        self.price * amount * (1.0 - self.fee)
    }

    fn commission(&self, _amount: f64) -> f64 {
        0.0
    }

    fn reference_url(&self) -> Option<String> {
        None
    }
}

/// 由交易所行情构建的边
///
/// `is_direct` 为真时方向是 base -> quote，按 ask 成交；
/// 否则是 quote -> base，按 1/bid 成交。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeEdge {
    pub from: Node,
    pub to: Node,
    pub base: String,
    pub quote: String,
    pub bid: f64,
    pub ask: f64,
    pub taker_fee: f64,
    pub is_direct: bool,
}

impl ExchangeEdge {
    pub fn new(ticker: &Ticker, market: &Market, is_direct: bool) -> DeciderResult<Self> {
        let (bid, ask) = match (ticker.bid, ticker.ask) {
            (Some(bid), Some(ask)) if bid > 0.0 && ask > 0.0 => (bid, ask),
            _ => {
                return Err(DeciderError::data(format!(
                    "Ticker {} has no usable bid/ask",
                    ticker.symbol
                )))
            }
        };

        let base = Node::asset(&market.base);
        let quote = Node::asset(&market.quote);
        let (from, to) = if is_direct { (base, quote) } else { (quote, base) };

        Ok(Self {
            from,
            to,
            base: market.base.clone(),
            quote: market.quote.clone(),
            bid,
            ask,
            taker_fee: market.taker,
            is_direct,
        })
    }

    fn price(&self) -> f64 {
        if self.is_direct {
            self.ask
        } else {
            1.0 / self.bid
        }
    }
}

impl ConversionRate for ExchangeEdge {
    fn from_node(&self) -> &Node {
        &self.from
    }

    fn to_node(&self) -> &Node {
        &self.to
    }

    fn convert(&self, amount: f64) -> f64 {
        amount * self.price()
    }

    fn commission(&self, amount: f64) -> f64 {
        amount * self.taker_fee
    }

    fn reference_url(&self) -> Option<String> {
        Some(format!(
            "{}/{}_{}?type=spot",
            EXCHANGE_TRADE_URL, self.base, self.quote
        ))
    }
}

/// 由一组同方向、同法币、同资产的 C2C 报价构建的边
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct P2pEdge {
    pub from: Node,
    pub to: Node,
    pub trade_type: TradeType,
    pub fiat: String,
    pub asset: String,
    pub median_price: f64,
    pub price: f64,             // 每单位 from 兑换的 to
    pub offer_count: usize,
}

impl P2pEdge {
    /// 报价需已由数据源排好序（通常最优价在前）
    pub fn from_offers(offers: &[C2cOffer], median_of_first_n: usize) -> DeciderResult<Self> {
        let first = offers
            .first()
            .ok_or_else(|| DeciderError::validation("Cannot build a P2P edge from zero offers"))?;
        if median_of_first_n == 0 {
            return Err(DeciderError::validation("median_of_first_n must be at least 1"));
        }

        let trade_type = first.adv.trade_type;
        let fiat = first.adv.fiat_unit.clone();
        let asset = first.adv.asset.clone();

        if let Some(odd) = offers.iter().find(|offer| {
            offer.adv.trade_type != trade_type
                || offer.adv.fiat_unit != fiat
                || offer.adv.asset != asset
        }) {
            return Err(DeciderError::validation(format!(
                "Mixed offer list: expected {} {}/{}, got {} {}/{}",
                trade_type, asset, fiat, odd.adv.trade_type, odd.adv.asset, odd.adv.fiat_unit
            )));
        }

        let prices = offers
            .iter()
            .map(|offer| str_to_bigdecimal(&offer.adv.price))
            .collect::<DeciderResult<Vec<BigDecimal>>>()?;
        let median = median_of_first(&prices, median_of_first_n)
            .ok_or_else(|| DeciderError::data("No prices to aggregate"))?;
        if median <= BigDecimal::zero() {
            return Err(DeciderError::data(format!(
                "Median price {} for {} {}/{} is not positive",
                median, trade_type, asset, fiat
            )));
        }

        let fiat_node = Node::fiat(&fiat);
        let asset_node = Node::asset(&asset);
        let (from, to, price) = match trade_type {
            TradeType::Buy => (fiat_node, asset_node, bigdecimal_to_f64(&median)?),
            TradeType::Sell => (
                asset_node,
                fiat_node,
                bigdecimal_to_f64(&(BigDecimal::from(1) / &median))?,
            ),
        };
        debug!(
            "C2C {} {}/{}: 中位价 {} ({} 条报价)",
            trade_type,
            asset,
            fiat,
            median,
            offers.len()
        );

        Ok(Self {
            from,
            to,
            trade_type,
            fiat,
            asset,
            median_price: bigdecimal_to_f64(&median)?,
            price,
            offer_count: offers.len(),
        })
    }
}

impl ConversionRate for P2pEdge {
    fn from_node(&self) -> &Node {
        &self.from
    }

    fn to_node(&self) -> &Node {
        &self.to
    }

    fn convert(&self, amount: f64) -> f64 {
        amount * self.price
    }

    fn commission(&self, _amount: f64) -> f64 {
        0.0
    }

    /// 链接跟随边的方向：法币 -> 资产 指向购买页，资产 -> 法币 指向出售页
    fn reference_url(&self) -> Option<String> {
        let (path, params): (String, Vec<(&str, &str)>) = match self.trade_type {
            TradeType::Buy => (
                format!("{}/all-payments/{}", C2C_TRADE_URL, self.asset),
                vec![("fiat", self.fiat.as_str())],
            ),
            TradeType::Sell => (
                format!("{}/sell/{}", C2C_TRADE_URL, self.asset),
                vec![("fiat", self.fiat.as_str()), ("payment", "ALL")],
            ),
        };
        Url::parse_with_params(&path, params)
            .ok()
            .map(String::from)
    }
}

/// 图中的边：三种实现共享同一能力集
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edge {
    Raw(RawEdge),
    Exchange(ExchangeEdge),
    P2p(P2pEdge),
}

impl Edge {
    pub fn raw(from: Node, to: Node, price: f64, fee: f64) -> Self {
        Edge::Raw(RawEdge::new(from, to, price, fee))
    }

    fn inner(&self) -> &dyn ConversionRate {
        match self {
            Edge::Raw(edge) => edge,
            Edge::Exchange(edge) => edge,
            Edge::P2p(edge) => edge,
        }
    }
}

impl ConversionRate for Edge {
    fn from_node(&self) -> &Node {
        self.inner().from_node()
    }

    fn to_node(&self) -> &Node {
        self.inner().to_node()
    }

    fn convert(&self, amount: f64) -> f64 {
        self.inner().convert(amount)
    }

    fn commission(&self, amount: f64) -> f64 {
        self.inner().commission(amount)
    }

    fn reference_url(&self) -> Option<String> {
        self.inner().reference_url()
    }
}

/// 比较端点和可观测汇率，不比较数据源内部载荷
impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.from_node() == other.from_node()
            && self.to_node() == other.to_node()
            && self.convert(1.0) == other.convert(1.0)
            && self.commission(1.0) == other.commission(1.0)
    }
}

impl From<RawEdge> for Edge {
    fn from(edge: RawEdge) -> Self {
        Edge::Raw(edge)
    }
}

impl From<ExchangeEdge> for Edge {
    fn from(edge: ExchangeEdge) -> Self {
        Edge::Exchange(edge)
    }
}

impl From<P2pEdge> for Edge {
    fn from(edge: P2pEdge) -> Self {
        Edge::P2p(edge)
    }
}
