//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::hooks::{Assertion, EnvironmentBinding};
use crate::registry::ComponentRegistry;
use crate::resolver::{ComponentResolver, ResolveOptions};
use infrastructure_common::Environment;
use serde::{Deserialize, Serialize};

/// 依赖注入容器 trait
///
/// 在注册与解析之上增加构造后钩子、宿主环境与派生子作用域
pub trait DiContainer: ComponentRegistry + ComponentResolver {
    /// 登记断言
    fn add_assertion(&self, assertion: Assertion);

    /// 登记环境绑定
    fn add_binding(&self, binding: EnvironmentBinding);

    /// 宿主环境
    fn environment(&self) -> &Environment;

    /// 派生子作用域
    ///
    /// 复制注册模板但不共享实例缓存，环境为父环境与 `overrides` 的合并
    fn fork(&self, overrides: Environment) -> Self
    where
        Self: Sized;
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 最大解析深度
    pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 100,
        }
    }
}

impl ContainerConfig {
    /// 转换为解析选项
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_depth: self.max_resolution_depth,
        }
    }
}
