//! 日志初始化

use infrastructure_common::{InfrastructureError, InfrastructureResult};
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 按名称设置日志级别，例如 `debug`
    pub fn with_level_name(mut self, level: &str) -> InfrastructureResult<Self> {
        self.level = tracing::Level::from_str(level).map_err(|_| {
            InfrastructureError::BootstrapFailed {
                message: format!("无效的日志级别: {level}"),
            }
        })?;
        Ok(self)
    }

    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    /// 日志过滤器，`RUST_LOG` 优先
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_ascii_lowercase()))
    }
}

/// 初始化全局日志订阅器
///
/// 已经初始化过时返回错误，不会替换现有订阅器
pub fn init_logging(config: &LoggingConfig) -> InfrastructureResult<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}
