// ==========================================
// 全球服务价格手册与报价系统 - 日志系统
// ==========================================
// 基于 tracing / tracing-subscriber, 级别由环境变量控制
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 缺省日志过滤器 (导入与报价路径的关键步骤都打在 info 级)
const DEFAULT_FILTER: &str = "info";

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 级别过滤器, 例如 RUST_LOG=global_pricebook=debug
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统 (debug 级 + 测试捕获输出, 可重复调用)
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
