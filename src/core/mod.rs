pub mod conversion_chain;
pub mod edge;
pub mod exchange_graph;
pub mod path;
pub mod types;

// 重新导出核心类型，方便外部使用
pub use conversion_chain::{materialize, materialize_all, ConversionHop, ConversionPath};
pub use edge::{ConversionRate, Edge, ExchangeEdge, P2pEdge, RawEdge, DEFAULT_MEDIAN_OF_FIRST_N};
pub use exchange_graph::{ConversionGraph, MAX_HOPS_CEILING};
pub use path::{ordered_paths, Path, HOP_PENALTY};
pub use types::*;
