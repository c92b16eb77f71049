//! # Infrastructure Common
//!
//! 这个 crate 提供了依赖注入基础设施的公共类型。
//!
//! ## 核心内容
//!
//! - [`Instance`] - 类型擦除的组件实例
//! - [`Environment`] - 作用域的宿主环境
//! - [`ComponentMetadata`] - 组件元数据
//! - [`DependencyError`] / [`ConfigError`] / [`InfrastructureError`] - 错误类型
//!
//! ## 设计原则
//!
//! - 组件以名称标识，实例在边界处再向下转换为具体类型
//! - 所有错误都向调用方传播，基础设施内部不做恢复

pub mod component;
pub mod environment;
pub mod errors;
pub mod metadata;

pub use component::*;
pub use environment::*;
pub use errors::*;
pub use metadata::*;
