//! 日志初始化
//!
//! 输出到 stderr，stdout 只留给命令结果。`RUST_LOG` 优先于配置中的级别。

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// 根据配置构造过滤器
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化全局 subscriber，重复调用时忽略
pub fn init_logging(config: &LoggingConfig) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if result.is_ok() {
        tracing::debug!("[LOGGER] 日志已初始化, level={}", config.level);
    }
}
