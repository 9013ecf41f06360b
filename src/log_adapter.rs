use log::LevelFilter;

/// 日志适配器，按命令行 `-v` 次数决定默认级别
///
/// `RUST_LOG` 环境变量始终优先。
pub struct LogAdapter;

impl LogAdapter {
    /// 初始化日志系统
    pub fn init(verbosity: u8) {
        let _ = env_logger::Builder::new()
            .filter_level(Self::level_for(verbosity))
            .parse_default_env()
            .format_timestamp_secs()
            .try_init();
    }

    /// 0 -> warn, 1 -> info, 2 -> debug, 3+ -> trace
    pub fn level_for(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogAdapter::level_for(0), LevelFilter::Warn);
        assert_eq!(LogAdapter::level_for(1), LevelFilter::Info);
        assert_eq!(LogAdapter::level_for(2), LevelFilter::Debug);
        assert_eq!(LogAdapter::level_for(7), LevelFilter::Trace);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        LogAdapter::init(1);
        LogAdapter::init(2);
    }
}
