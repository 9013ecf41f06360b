use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use std::str::FromStr;

use crate::error::{DeciderError, DeciderResult};

/// 将价格字符串转换为 BigDecimal
pub fn str_to_bigdecimal(s: &str) -> DeciderResult<BigDecimal> {
    BigDecimal::from_str(s.trim())
        .map_err(|e| DeciderError::data(format!("Failed to parse price '{}': {}", s, e)))
}

/// BigDecimal 转 f64，超出范围时报数据错误
pub fn bigdecimal_to_f64(value: &BigDecimal) -> DeciderResult<f64> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DeciderError::data(format!("Value {} does not fit into f64", value)))
}

/// 取前 N 个值的中位数；偶数个时取中间两个的平均值
pub fn median_of_first(values: &[BigDecimal], n: usize) -> Option<BigDecimal> {
    let mut head: Vec<&BigDecimal> = values.iter().take(n).collect();
    if head.is_empty() {
        return None;
    }
    head.sort();

    let mid = head.len() / 2;
    if head.len() % 2 == 1 {
        Some(head[mid].clone())
    } else {
        Some((head[mid - 1] + head[mid]) / BigDecimal::from(2))
    }
}

/// 格式化金额用于显示：小于 1 的金额保留 8 位小数
pub fn format_amount(amount: f64) -> String {
    if amount != 0.0 && amount.abs() < 1.0 {
        format!("{:.8}", amount)
    } else {
        format!("{:.3}", amount)
    }
}

/// 浮点数近似比较（相对误差）
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= tolerance * scale
}
