use std::collections::BTreeMap;
use std::fs;
use std::path::Path as FsPath;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::CacheConfig;
use crate::core::types::{Market, Ticker, TradeType};
use crate::error::{DeciderError, DeciderResult};
use crate::providers::{AssetOffers, OfferSource, QuoteSource};

/// 快照中记录的一次上游请求
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotSource {
    pub url: String,
    pub method: String,
    pub fetched_at: DateTime<Utc>,
}

/// 离线行情快照：交易所行情 + C2C 报价
///
/// 抓取与缓存由外部完成，这里只读取落盘后的 JSON。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub sources: Vec<SnapshotSource>,
    #[serde(default)]
    pub tickers: BTreeMap<String, Ticker>,
    #[serde(default)]
    pub markets: Vec<Market>,
    /// 法币 -> 方向 -> 资产 -> 报价
    #[serde(default)]
    pub offers: BTreeMap<String, BTreeMap<TradeType, AssetOffers>>,
}

impl MarketSnapshot {
    pub fn load(path: impl AsRef<FsPath>) -> DeciderResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DeciderError::provider(format!("Failed to read snapshot {}: {}", path.display(), e))
        })?;
        let snapshot = Self::from_json(&content)?;
        info!(
            "📂 已加载快照 {}: {} 个行情, {} 个交易对, {} 种法币报价",
            path.display(),
            snapshot.tickers.len(),
            snapshot.markets.len(),
            snapshot.offers.len()
        );
        Ok(snapshot)
    }

    pub fn from_json(content: &str) -> DeciderResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| DeciderError::provider(format!("Malformed snapshot: {}", e)))
    }

    /// 按缓存策略检查数据新鲜度，只记录告警，不拒绝数据
    ///
    /// 返回过期来源的数量。
    pub fn check_freshness(&self, cache: &CacheConfig, now: DateTime<Utc>) -> usize {
        let mut stale = 0;
        for source in &self.sources {
            if !cache.is_cacheable(&source.method) {
                warn!("{} {} 不在可缓存方法列表中", source.method, source.url);
            }

            let age = now.signed_duration_since(source.fetched_at);
            let expiry = cache.expiry_for(&source.url);
            let expired = match age.to_std() {
                Ok(age) => age > expiry,
                // fetched_at 在未来
                Err(_) => false,
            };
            if expired {
                warn!(
                    "⚠️ 数据已过期: {} 抓取于 {}, 有效期 {} 秒",
                    source.url,
                    source.fetched_at,
                    expiry.as_secs()
                );
                stale += 1;
            }
        }
        stale
    }
}

impl QuoteSource for MarketSnapshot {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn tickers(&self) -> DeciderResult<Vec<Ticker>> {
        Ok(self.tickers.values().cloned().collect())
    }

    fn markets(&self) -> DeciderResult<Vec<Market>> {
        Ok(self.markets.clone())
    }
}

impl OfferSource for MarketSnapshot {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn offers(&self, fiat: &str, trade_type: TradeType) -> DeciderResult<AssetOffers> {
        Ok(self
            .offers
            .get(fiat)
            .and_then(|sides| sides.get(&trade_type))
            .cloned()
            .unwrap_or_default())
    }
}
