//! 日志工具模块
//!
//! 提供日志初始化和批次输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::services::bounds_resolver::natural_max_hint;
use crate::workflow::GenerationCtx;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 `debug` 或 `info`。
/// 重复调用不会报错（测试中会多次初始化）。
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, ctx: &GenerationCtx) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 口算练习题生成");
    info!("🧮 运算: {} | 题目数量: {}", ctx.operation.name(), config.num_questions);
    info!("📐 数位设置: {} | 范围: {}", config.num_numerals, ctx);
    if !config.max_limit_enabled {
        info!("💡 可设置上限，例如: {}", natural_max_hint(&ctx.term_specs));
    }
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
///
/// # 参数
/// - `count`: 生成的题目数量
/// - `elapsed_ms`: 耗时（毫秒）
pub fn log_batch_complete(count: usize, elapsed_ms: u128) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 本批完成: 共 {} 道题, 耗时 {} ms", count, elapsed_ms);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `total`: 题目总数
/// - `worksheet_path`: 题目页路径
/// - `answer_key_path`: 答案页路径
pub fn print_final_stats(total: usize, worksheet_path: &str, answer_key_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 题目: {}", total);
    info!("📄 题目页: {}", worksheet_path);
    info!("🔑 答案页: {}", answer_key_path);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("\\(12 + 3\\)", 4), "\\(12...");
        assert_eq!(truncate_text("短文本", 10), "短文本");
    }
}
