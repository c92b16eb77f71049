//! # 基础设施组合层
//!
//! 把组件定义、启动配置与日志组合成可运行的系统。
//!
//! ## 主要功能
//!
//! - **组件目录**: [`ComponentCatalog`] 是显式传递的默认容器，不依赖全局状态
//! - **启动配置**: [`StartOptions`] 从 JSON 或 TOML 读取实例的选项与别名
//! - **启动流程**: [`start`] 为每个实例创建独立作用域并解析
//! - **日志**: [`LoggingConfig`] 与 [`init_logging`]
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{ComponentCatalog, InfrastructureBootstrapper, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = ComponentCatalog::new();
//!
//!     let instances = InfrastructureBootstrapper::new(catalog)
//!         .with_options_file("config/start.toml")?
//!         .with_logging(LoggingConfig::development())
//!         .bootstrap()?;
//!
//!     for (name, _) in &instances {
//!         println!("已启动: {}", name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod catalog;
pub mod logging;
pub mod options;

// 重新导出主要类型
pub use bootstrapper::{start, start_with_environment, InfrastructureBootstrapper};
pub use catalog::ComponentCatalog;
pub use logging::{init_logging, LoggingConfig};
pub use options::{InstanceOptions, StartOptions};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
