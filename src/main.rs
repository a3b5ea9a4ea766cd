use anyhow::Result;
use std::path::PathBuf;
use tracing::error;

use arithmetic_worksheet::utils::logging;
use arithmetic_worksheet::{App, Config};

fn main() -> Result<()> {
    // 第一个参数为可选的配置文件路径
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    // 加载配置
    let config = Config::load(config_path.as_deref())?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let mut app = match App::initialize(config) {
        Ok(app) => app,
        Err(e) => {
            if e.is_config_error() {
                error!("❌ 设置有误，未生成题目: {}", e);
            }
            return Err(e.into());
        }
    };
    let _summary = app.run()?;

    Ok(())
}
