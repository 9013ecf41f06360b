use std::fmt;

use crate::core::edge::{ConversionRate, Edge};
use crate::core::types::Node;
use crate::error::{DeciderError, DeciderResult};

/// 每多一跳的时间/风险惩罚
pub const HOP_PENALTY: f64 = 0.02;

/// 一条首尾相接的边序列
///
/// 由图遍历产生，借用图中的边，不单独存活。
#[derive(Debug, Clone, PartialEq)]
pub struct Path<'g> {
    edges: Vec<&'g Edge>,
    origin: Option<Node>,       // 仅零跳路径（起点即终点）记录所在节点
}

impl<'g> Path<'g> {
    /// 遍历内部使用，调用方保证首尾相接
    pub(crate) fn contiguous(edges: Vec<&'g Edge>) -> Self {
        Self { edges, origin: None }
    }

    /// 停留在 `node` 的零跳路径
    pub fn stationary(node: Node) -> Self {
        Self {
            edges: Vec::new(),
            origin: Some(node),
        }
    }

    /// 从手工给定的边构建路径，校验首尾相接
    pub fn from_edges(edges: Vec<&'g Edge>) -> DeciderResult<Self> {
        for pair in edges.windows(2) {
            if pair[0].to_node() != pair[1].from_node() {
                return Err(DeciderError::validation(format!(
                    "Path is not contiguous: {} -> {} followed by {} -> {}",
                    pair[0].from_node(),
                    pair[0].to_node(),
                    pair[1].from_node(),
                    pair[1].to_node()
                )));
            }
        }
        Ok(Self { edges, origin: None })
    }

    pub fn edges(&self) -> &[&'g Edge] {
        &self.edges
    }

    /// 跳数
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn source(&self) -> Option<&Node> {
        self.edges
            .first()
            .map(|edge| edge.from_node())
            .or(self.origin.as_ref())
    }

    pub fn target(&self) -> Option<&Node> {
        self.edges
            .last()
            .map(|edge| edge.to_node())
            .or(self.origin.as_ref())
    }

    /// 聚合汇率：各边净汇率的乘积（空路径为 1）
    pub fn rate(&self) -> f64 {
        self.edges.iter().map(|edge| edge.net_rate()).product()
    }

    /// 带跳数惩罚的评分：rate * (1 - 0.02)^hops
    pub fn score(&self) -> f64 {
        self.rate() * (1.0 - HOP_PENALTY).powi(self.len() as i32)
    }

    /// 路径的可读形式，如 `KZT(f)-USDT-RUB(f)`
    pub fn route_label(&self) -> String {
        if self.edges.is_empty() {
            return self.origin.as_ref().map(|node| node.to_string()).unwrap_or_default();
        }
        let mut currencies: Vec<&str> = self
            .edges
            .iter()
            .map(|edge| edge.from_node().currency())
            .collect();
        if let Some(target) = self.target() {
            currencies.push(target.currency());
        }
        currencies.join("-")
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.6}", self.route_label(), self.rate())
    }
}

/// 按评分从高到低排序；评分相同时保持原枚举顺序，NaN 评分排在最后
pub fn ordered_paths<'g>(mut paths: Vec<Path<'g>>) -> Vec<Path<'g>> {
    paths.sort_by(|a, b| sort_key(b).total_cmp(&sort_key(a)));
    paths
}

fn sort_key(path: &Path<'_>) -> f64 {
    let score = path.score();
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}
