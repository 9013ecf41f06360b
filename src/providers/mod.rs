pub mod c2c;
pub mod exchange;
pub mod snapshot;

use std::collections::BTreeMap;

use crate::core::types::{C2cOffer, Market, Ticker, TradeType};
use crate::error::DeciderResult;

pub use c2c::{add_offers_to_graph, load_c2c_to_graph};
pub use exchange::add_quotes_to_graph;
pub use snapshot::MarketSnapshot;

/// 资产代码 -> 该资产的报价列表（已按最优价排序）
pub type AssetOffers = BTreeMap<String, Vec<C2cOffer>>;

/// 交易所行情数据源
pub trait QuoteSource {
    /// 数据源名称
    fn name(&self) -> &str;

    /// 所有交易对的最新行情
    fn tickers(&self) -> DeciderResult<Vec<Ticker>>;

    /// 交易对元数据（含手续费率）
    fn markets(&self) -> DeciderResult<Vec<Market>>;
}

/// C2C 报价数据源
pub trait OfferSource {
    fn name(&self) -> &str;

    /// 指定法币与交易方向下，按资产分组的报价
    fn offers(&self, fiat: &str, trade_type: TradeType) -> DeciderResult<AssetOffers>;
}
