//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`ComponentResolver`] - 组件解析器接口
//! - [`DiContainer`] - 带钩子与子作用域的容器接口
//! - [`Injectable`] - 注解适配器生成的组件约定

pub mod container;
pub mod factory;
pub mod hooks;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use factory::*;
pub use hooks::*;
pub use registry::*;
pub use resolver::*;
