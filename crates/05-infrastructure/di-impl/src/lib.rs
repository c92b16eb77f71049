//! # 依赖注入具体实现
//!
//! 提供按名称注册与解析组件的作用域容器 [`Scope`]。
//!
//! 组件在作用域内单例缓存；断言在实例缓存前校验，环境绑定把实例写入宿主环境；
//! [`Scope::fork`] 派生出拥有独立缓存的子作用域。

mod resolve;
pub mod scope;

pub use scope::Scope;
