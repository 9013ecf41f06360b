use anyhow::{Context, Result};
use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::core::edge::DEFAULT_MEDIAN_OF_FIRST_N;

/// 默认配置文件名，可用 RATE_DECIDER_CONFIG 覆盖
pub const DEFAULT_CONFIG_FILE: &str = "rate-decider.toml";
pub const CONFIG_PATH_ENV: &str = "RATE_DECIDER_CONFIG";
pub const ENV_PREFIX: &str = "DECIDER";

const MINUTE: u64 = 60;
const DAY: u64 = 24 * 60 * MINUTE;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub snapshot: SnapshotConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub max_hops: usize,
    pub median_of_first_n: usize,
    pub top: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SnapshotConfig {
    pub path: String,
}

/// 上游请求缓存策略，只用于判断快照数据是否新鲜
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub cache_name: String,
    pub default_expiry_secs: u64,
    pub per_endpoint_expiry: HashMap<String, u64>,
    pub cached_methods: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_hops: 3,
            median_of_first_n: DEFAULT_MEDIAN_OF_FIRST_N,
            top: 10,
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: "data/snapshot.json".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        let mut per_endpoint_expiry = HashMap::new();
        per_endpoint_expiry.insert(
            "c2c.binance.com/bapi/c2c/v2/friendly/c2c/portal/config".to_string(),
            3 * DAY,
        );
        per_endpoint_expiry.insert(
            "c2c.binance.com/bapi/c2c/v2/friendly/c2c/adv/search".to_string(),
            30 * MINUTE,
        );
        per_endpoint_expiry.insert("api.binance.com/api/v3/exchangeInfo".to_string(), 3 * DAY);
        per_endpoint_expiry.insert("api.binance.com/api/v3/ticker/24hr".to_string(), 30 * MINUTE);

        Self {
            cache_name: "cache".to_string(),
            default_expiry_secs: 60 * MINUTE,
            per_endpoint_expiry,
            cached_methods: vec!["GET".to_string(), "POST".to_string()],
        }
    }
}

impl CacheConfig {
    /// 按 URL 匹配过期时间，多个模式命中时取最长的那个
    pub fn expiry_for(&self, url: &str) -> Duration {
        let secs = self
            .per_endpoint_expiry
            .iter()
            .filter(|(pattern, _)| url.contains(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, secs)| *secs)
            .unwrap_or(self.default_expiry_secs);
        Duration::from_secs(secs)
    }

    pub fn is_cacheable(&self, method: &str) -> bool {
        self.cached_methods
            .iter()
            .any(|cached| cached.eq_ignore_ascii_case(method))
    }
}

impl Config {
    /// 默认值 -> 配置文件（可选）-> DECIDER_ 前缀环境变量
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("读取配置失败: {}", path))?;

        settings
            .try_deserialize()
            .with_context(|| format!("解析配置失败: {}", path))
    }
}
