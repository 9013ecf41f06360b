//! Rate Decider - 法币多跳兑换路径搜索
//!
//! 把交易所行情与 C2C 报价合并成一张有向兑换图，枚举两种法币之间的
//! 所有有限跳数路径，按带跳数惩罚的汇率评分排序，并按给定金额逐跳展开。

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod finder;
pub mod log_adapter;
pub mod providers;
pub mod table_display;
pub mod utils;

// 重新导出常用类型
pub use crate::config::Config;
pub use crate::core::{
    materialize, materialize_all, ConversionGraph, ConversionHop, ConversionPath, ConversionRate,
    Edge, Node, Path,
};
pub use crate::error::{DeciderError, DeciderResult};
pub use crate::finder::RouteFinder;
pub use crate::providers::{MarketSnapshot, OfferSource, QuoteSource};
