use log::debug;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::core::edge::ConversionRate;
use crate::core::path::{ordered_paths, Path};
use crate::error::{DeciderError, DeciderResult};
use crate::utils::format_amount;

fn display_amount(amount: &f64) -> String {
    format_amount(*amount)
}

fn display_rate(rate: &f64) -> String {
    format!("{:.8}", rate)
}

fn display_url(url: &Option<String>) -> String {
    url.clone().unwrap_or_else(|| "-".to_string())
}

/// 兑换链中的一跳
///
/// `rate` 统一按 `to_amount / from_amount` 报告（每单位源币得到的目标币）。
#[derive(Debug, Clone, Serialize, Deserialize, Tabled, PartialEq)]
pub struct ConversionHop {
    #[tabled(rename = "From")]
    pub from_currency: String,
    #[tabled(rename = "Amount in", display_with = "display_amount")]
    pub from_amount: f64,
    #[tabled(rename = "To")]
    pub to_currency: String,
    #[tabled(rename = "Amount out", display_with = "display_amount")]
    pub to_amount: f64,
    #[tabled(rename = "Rate", display_with = "display_rate")]
    pub rate: f64,
    #[tabled(rename = "Commission", display_with = "display_amount")]
    pub commission: f64,            // 以源币计
    #[tabled(rename = "Link", display_with = "display_url")]
    pub reference_url: Option<String>,
}

/// 针对具体金额展开后的完整兑换路径
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversionPath {
    pub source_currency: String,
    pub source_amount: f64,
    pub target_currency: String,
    pub target_amount: f64,
    pub rate: f64,                  // target_amount / source_amount
    pub score: f64,                 // 带跳数惩罚的排序评分
    pub hops: Vec<ConversionHop>,
}

impl ConversionPath {
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    /// 路径的可读形式，如 `KZT(f)-USDT-RUB(f)`
    pub fn route_label(&self) -> String {
        if self.hops.is_empty() {
            return self.source_currency.clone();
        }
        let mut currencies: Vec<&str> = self.hops.iter().map(|hop| hop.from_currency.as_str()).collect();
        currencies.push(&self.target_currency);
        currencies.join("-")
    }

    /// 各跳手续费之和（各自以该跳源币计，仅作展示）
    pub fn total_commission(&self) -> f64 {
        self.hops.iter().map(|hop| hop.commission).sum()
    }
}

/// 按给定源币金额逐跳展开路径
///
/// 每跳先扣手续费再兑换，净额作为下一跳的输入。零跳路径（起点即终点）
/// 展开为空的跳列表，目标金额等于源金额。
pub fn materialize(path: &Path<'_>, source_amount: f64) -> DeciderResult<ConversionPath> {
    if !source_amount.is_finite() || source_amount <= 0.0 {
        return Err(DeciderError::validation(format!(
            "Source amount must be a positive number, got {}",
            source_amount
        )));
    }

    let source_currency = path
        .source()
        .map(|node| node.currency().to_string())
        .ok_or_else(|| DeciderError::validation("Cannot materialize a path without a source"))?;

    let mut amount = source_amount;
    let mut hops = Vec::with_capacity(path.len());
    for edge in path.edges() {
        let commission = edge.commission(amount);
        let net_converted = edge.net_converted(amount);
        if !net_converted.is_finite() {
            return Err(DeciderError::data(format!(
                "Conversion {} -> {} produced a non-finite amount",
                edge.from_node(),
                edge.to_node()
            )));
        }

        hops.push(ConversionHop {
            from_currency: edge.from_node().currency().to_string(),
            from_amount: amount,
            to_currency: edge.to_node().currency().to_string(),
            to_amount: net_converted,
            rate: net_converted / amount,
            commission,
            reference_url: edge.reference_url(),
        });
        amount = net_converted;
    }

    let target_currency = path
        .target()
        .map(|node| node.currency().to_string())
        .unwrap_or_else(|| source_currency.clone());

    Ok(ConversionPath {
        source_currency,
        source_amount,
        target_currency,
        target_amount: amount,
        rate: amount / source_amount,
        score: path.score(),
        hops,
    })
}

/// 排序后逐条展开；任何一条失败都会中止整批
pub fn materialize_all(paths: Vec<Path<'_>>, source_amount: f64) -> DeciderResult<Vec<ConversionPath>> {
    let ranked = ordered_paths(paths);
    debug!("展开 {} 条已排序路径，金额 {}", ranked.len(), source_amount);
    ranked
        .iter()
        .map(|path| materialize(path, source_amount))
        .collect()
}
