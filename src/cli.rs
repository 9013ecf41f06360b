use anyhow::{Context, Result};
use chrono::Utc;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::info;

use crate::config::Config;
use crate::finder::RouteFinder;
use crate::providers::MarketSnapshot;
use crate::table_display::render_paths;

// 命令行参数常量
const CURRENCY_FROM_ARG: &str = "currency-from";
const CURRENCY_TO_ARG: &str = "currency-to";
const MAX_LENGTH_ARG: &str = "max-length";
const AMOUNT_ARG: &str = "amount";
const SNAPSHOT_ARG: &str = "snapshot";
const TOP_ARG: &str = "top";
const JSON_ARG: &str = "json";
const DETAILS_ARG: &str = "details";
const VERBOSE_ARG: &str = "verbose";

/// CLI应用程序结构
pub struct CliApp {
    config: Config,
}

impl CliApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 构建命令行参数解析器
    pub fn build_cli() -> Command {
        Command::new("rate-decider")
            .version(env!("CARGO_PKG_VERSION"))
            .about("法币多跳兑换路径搜索")
            .arg(
                Arg::new(CURRENCY_FROM_ARG)
                    .long(CURRENCY_FROM_ARG)
                    .help("源法币代码")
                    .value_name("FIAT")
                    .default_value("KZT"),
            )
            .arg(
                Arg::new(CURRENCY_TO_ARG)
                    .long(CURRENCY_TO_ARG)
                    .help("目标法币代码")
                    .value_name("FIAT")
                    .default_value("RUB"),
            )
            .arg(
                Arg::new(MAX_LENGTH_ARG)
                    .long(MAX_LENGTH_ARG)
                    .help("最大跳数 (默认取配置 search.max_hops)")
                    .value_name("HOPS")
                    .value_parser(value_parser!(usize)),
            )
            .arg(
                Arg::new(AMOUNT_ARG)
                    .long(AMOUNT_ARG)
                    .help("源法币金额")
                    .value_name("AMOUNT")
                    .default_value("1")
                    .value_parser(value_parser!(f64)),
            )
            .arg(
                Arg::new(SNAPSHOT_ARG)
                    .long(SNAPSHOT_ARG)
                    .help("行情快照 JSON 路径 (默认取配置 snapshot.path)")
                    .value_name("FILE"),
            )
            .arg(
                Arg::new(TOP_ARG)
                    .long(TOP_ARG)
                    .short('n')
                    .help("显示的路径数量 (默认取配置 search.top)")
                    .value_name("NUMBER")
                    .value_parser(value_parser!(usize)),
            )
            .arg(
                Arg::new(JSON_ARG)
                    .long(JSON_ARG)
                    .help("以 JSON 输出结果")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new(DETAILS_ARG)
                    .long(DETAILS_ARG)
                    .short('d')
                    .help("显示每条路径的逐跳明细")
                    .action(ArgAction::SetTrue)
                    .conflicts_with(JSON_ARG),
            )
            .arg(
                Arg::new(VERBOSE_ARG)
                    .short('v')
                    .long(VERBOSE_ARG)
                    .help("日志详细程度，可重复")
                    .action(ArgAction::Count),
            )
    }

    /// `-v` 出现次数
    pub fn verbosity(matches: &ArgMatches) -> u8 {
        matches.get_count(VERBOSE_ARG)
    }

    /// 运行CLI应用程序，返回要打印到标准输出的内容
    pub fn run(&self, matches: &ArgMatches) -> Result<String> {
        let currency_from = matches
            .get_one::<String>(CURRENCY_FROM_ARG)
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| "KZT".to_string());
        let currency_to = matches
            .get_one::<String>(CURRENCY_TO_ARG)
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| "RUB".to_string());
        let amount = matches.get_one::<f64>(AMOUNT_ARG).copied().unwrap_or(1.0);
        let max_hops = matches
            .get_one::<usize>(MAX_LENGTH_ARG)
            .copied()
            .unwrap_or(self.config.search.max_hops);
        let top = matches
            .get_one::<usize>(TOP_ARG)
            .copied()
            .unwrap_or(self.config.search.top);
        let snapshot_path = matches
            .get_one::<String>(SNAPSHOT_ARG)
            .cloned()
            .unwrap_or_else(|| self.config.snapshot.path.clone());

        let snapshot = MarketSnapshot::load(&snapshot_path)?;
        snapshot.check_freshness(&self.config.cache, Utc::now());

        info!("查询 {} {} -> {} (最多 {} 跳)", amount, currency_from, currency_to, max_hops);
        let finder = RouteFinder::new(&self.config.search)
            .with_max_hops(max_hops)
            .with_top(top);
        let paths = finder.find(&snapshot, &snapshot, &currency_from, &currency_to, amount)?;

        if matches.get_flag(JSON_ARG) {
            return serde_json::to_string_pretty(&paths).context("序列化结果失败");
        }
        Ok(render_paths(&paths, matches.get_flag(DETAILS_ARG)))
    }
}
