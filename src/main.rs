use anyhow::Result;
use log::info;

use rate_decider::cli::CliApp;
use rate_decider::config::Config;
use rate_decider::log_adapter::LogAdapter;

fn main() -> Result<()> {
    // 加载 .env 文件
    dotenv::dotenv().ok();

    let matches = CliApp::build_cli().get_matches();

    // 初始化日志系统
    LogAdapter::init(CliApp::verbosity(&matches));

    let config = Config::load()?;
    info!("配置加载完成");

    let output = CliApp::new(config).run(&matches)?;
    println!("{}", output);
    Ok(())
}
