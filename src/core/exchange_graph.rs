use std::collections::{HashMap, HashSet};
use log::{debug, warn};

use crate::core::edge::{ConversionRate, Edge};
use crate::core::path::Path;
use crate::core::types::Node;
use crate::error::{DeciderError, DeciderResult};

/// 最大跳数上限，无论调用方请求多少都会被截断到这个值
pub const MAX_HOPS_CEILING: usize = 4;

/// 兑换图：节点集合 + 边列表 + 按起点索引的邻接表
///
/// 图只增不减，每次查询请求都应新建一个实例。
#[derive(Debug, Default, Clone)]
pub struct ConversionGraph {
    nodes: HashSet<Node>,                       // 所有出现过的节点
    edges: Vec<Edge>,                           // 按注册顺序保存的边
    adjacency_list: HashMap<Node, Vec<usize>>,  // 节点 -> 出边在 edges 中的下标
}

impl ConversionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一条边，端点自动加入节点集合
    pub fn add(&mut self, edge: impl Into<Edge>) -> DeciderResult<()> {
        let edge = edge.into();
        if edge.from_node().is_unset() || edge.to_node().is_unset() {
            return Err(DeciderError::validation(format!(
                "Edge endpoints must be set, got '{}' -> '{}'",
                edge.from_node(),
                edge.to_node()
            )));
        }

        self.nodes.insert(edge.from_node().clone());
        self.nodes.insert(edge.to_node().clone());

        let index = self.edges.len();
        self.adjacency_list
            .entry(edge.from_node().clone())
            .or_insert_with(Vec::new)
            .push(index);
        self.edges.push(edge);
        Ok(())
    }

    /// 批量注册
    pub fn extend<I, E>(&mut self, edges: I) -> DeciderResult<usize>
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge>,
    {
        let mut count = 0;
        for edge in edges {
            self.add(edge)?;
            count += 1;
        }
        debug!("注册 {} 条边，当前节点 {} 个，边 {} 条", count, self.nodes.len(), self.edges.len());
        Ok(count)
    }

    pub fn nodes(&self) -> &HashSet<Node> {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.nodes.contains(&Node::new(currency))
    }

    /// 获取指定节点的所有出边（按注册顺序）
    pub fn edges_from<'g>(&'g self, node: &Node) -> impl Iterator<Item = &'g Edge> + 'g {
        self.adjacency_list
            .get(node)
            .map(|indices| indices.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&index| &self.edges[index])
    }

    /// 获取图的统计信息 (节点数, 边数)
    pub fn get_stats(&self) -> (usize, usize) {
        (self.nodes.len(), self.edges.len())
    }

    /// 枚举从 `from_currency` 到 `to_currency` 的所有路径（按 DFS 邻接顺序，未排序）
    ///
    /// 不做环路或重复边抑制，只由跳数上限约束；`max_hops` 超过
    /// [`MAX_HOPS_CEILING`] 时会被截断。
    pub fn paths(&self, from_currency: &str, to_currency: &str, max_hops: usize) -> Vec<Path<'_>> {
        let max_hops = if max_hops > MAX_HOPS_CEILING {
            warn!("最大跳数 {} 超过上限，截断为 {}", max_hops, MAX_HOPS_CEILING);
            MAX_HOPS_CEILING
        } else {
            max_hops
        };

        let from = Node::new(from_currency);
        let to = Node::new(to_currency);
        let mut found = Vec::new();
        let mut trail = Vec::with_capacity(max_hops);
        self.dfs_search(&from, &to, max_hops, &mut trail, &mut found);

        debug!("{} -> {} (最多 {} 跳): 找到 {} 条路径", from, to, max_hops, found.len());
        found
    }

    fn dfs_search<'g>(
        &'g self,
        current: &Node,
        target: &Node,
        max_hops: usize,
        trail: &mut Vec<&'g Edge>,
        found: &mut Vec<Path<'g>>,
    ) {
        // 到达目标即记录，不再从目标继续扩展
        if current == target {
            let path = if trail.is_empty() {
                Path::stationary(target.clone())
            } else {
                Path::contiguous(trail.clone())
            };
            found.push(path);
            return;
        }

        if trail.len() >= max_hops {
            return;
        }

        for edge in self.edges_from(current) {
            trail.push(edge);
            self.dfs_search(edge.to_node(), target, max_hops, trail, found);
            // 回溯
            trail.pop();
        }
    }
}
