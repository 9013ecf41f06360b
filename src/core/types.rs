use serde::{Deserialize, Serialize};
use std::fmt;

/// 法币节点的后缀标记，避免与同名的链上资产（如 RUB 代币）冲突
pub const FIAT_MARKER: &str = "(f)";

/// 图中的节点：一个币种标识
///
/// 两个节点相等当且仅当它们的代码相等。法币作为兑换端点时
/// 必须带上 `(f)` 后缀，这是节点身份的一部分而不是显示格式。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(String);

impl Node {
    pub fn new(currency: impl Into<String>) -> Self {
        Self(currency.into())
    }

    /// 链上资产节点，例如 `USDT`
    pub fn asset(code: &str) -> Self {
        Self(code.to_string())
    }

    /// 法币节点，例如 `KZT` -> `KZT(f)`
    pub fn fiat(code: &str) -> Self {
        Self(fiat_code(code))
    }

    pub fn currency(&self) -> &str {
        &self.0
    }

    pub fn is_fiat(&self) -> bool {
        self.0.ends_with(FIAT_MARKER)
    }

    /// 节点代码为空视为未设置
    pub fn is_unset(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Node {
    fn from(currency: &str) -> Self {
        Self::new(currency)
    }
}

/// 给法币代码加上 `(f)` 标记
pub fn fiat_code(code: &str) -> String {
    format!("{}{}", code, FIAT_MARKER)
}

/// C2C 交易方向（从用户视角看加密资产）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    /// 用法币买入加密资产
    Buy,
    /// 卖出加密资产换取法币
    Sell,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "BUY",
            TradeType::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 交易所行情（单一代表价，不建模盘口深度）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticker {
    pub symbol: String,         // 形如 BASE/QUOTE
    pub bid: Option<f64>,       // 买一价
    pub ask: Option<f64>,       // 卖一价
}

impl Ticker {
    pub fn new(symbol: &str, bid: f64, ask: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            bid: Some(bid),
            ask: Some(ask),
        }
    }

    /// 买卖价都存在且非零
    pub fn is_priced(&self) -> bool {
        matches!((self.bid, self.ask), (Some(bid), Some(ask)) if bid != 0.0 && ask != 0.0)
    }
}

/// 交易对元数据
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Market {
    pub symbol: String,
    pub base: String,
    pub quote: String,
    pub taker: f64,             // taker 手续费率
}

impl Market {
    pub fn new(base: &str, quote: &str, taker: f64) -> Self {
        Self {
            symbol: format!("{}/{}", base, quote),
            base: base.to_string(),
            quote: quote.to_string(),
            taker,
        }
    }
}

/// C2C 广告的核心字段，其余字段忽略
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    pub trade_type: TradeType,
    pub asset: String,
    pub fiat_unit: String,
    pub price: String,
    #[serde(default)]
    pub adv_no: Option<String>,
}

/// 一条 C2C 报价
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct C2cOffer {
    pub adv: Advertisement,
}

impl C2cOffer {
    pub fn new(trade_type: TradeType, asset: &str, fiat: &str, price: &str) -> Self {
        Self {
            adv: Advertisement {
                trade_type,
                asset: asset.to_string(),
                fiat_unit: fiat.to_string(),
                price: price.to_string(),
                adv_no: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fiat_marker_keeps_nodes_apart() {
        let token = Node::asset("RUB");
        let fiat = Node::fiat("RUB");
        assert_ne!(token, fiat);
        assert_eq!(fiat.currency(), "RUB(f)");
        assert!(fiat.is_fiat());
        assert!(!token.is_fiat());
    }

    #[test]
    fn test_ticker_priced() {
        assert!(Ticker::new("ETH/USDT", 1095.0, 1096.0).is_priced());
        let zero_bid = Ticker { symbol: "X/Y".to_string(), bid: Some(0.0), ask: Some(1.0) };
        assert!(!zero_bid.is_priced());
        let missing = Ticker { symbol: "X/Y".to_string(), bid: None, ask: Some(1.0) };
        assert!(!missing.is_priced());
    }

    #[test]
    fn test_offer_payload_deserialization() {
        let payload = r#"{
            "adv": {
                "advNo": "11372091689796468736",
                "classify": "mass",
                "tradeType": "SELL",
                "asset": "USDT",
                "fiatUnit": "KZT",
                "price": "456.84",
                "surplusAmount": "408.18"
            },
            "advertiser": {"nickName": "-VISA-MASTERCARD-"}
        }"#;
        let offer: C2cOffer = serde_json::from_str(payload).unwrap();
        assert_eq!(offer.adv.trade_type, TradeType::Sell);
        assert_eq!(offer.adv.fiat_unit, "KZT");
        assert_eq!(offer.adv.price, "456.84");
        assert_eq!(offer.adv.adv_no.as_deref(), Some("11372091689796468736"));
    }
}
