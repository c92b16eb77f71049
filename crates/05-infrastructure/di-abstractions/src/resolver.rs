//! 组件解析器抽象接口
//!
//! 提供按名称解析组件的能力

use infrastructure_common::{downcast_instance, DependencyError, DependencyResult, Instance};
use std::any::Any;
use std::sync::Arc;

/// 组件解析器 trait
///
/// 负责解析组件依赖并创建组件实例
pub trait ComponentResolver: Send + Sync {
    /// 解析指定名称的组件
    fn resolve_by_name(&self, name: &str) -> DependencyResult<Instance>;

    /// 检查是否可以解析指定名称的组件
    fn can_resolve(&self, name: &str) -> bool;

    /// 解析并向下转换为具体类型
    fn resolve<T>(&self, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
        Self: Sized,
    {
        downcast_instance::<T>(name, self.resolve_by_name(name)?)
    }
}

/// 解析上下文
///
/// 记录当前解析链，用于循环依赖报告和深度限制
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链
    pub resolution_chain: Vec<String>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加组件到解析链
    pub fn push(&mut self, name: &str) -> DependencyResult<()> {
        if self.resolution_chain.iter().any(|entry| entry == name) {
            return Err(self.cycle_error(name));
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                name: name.to_string(),
                max_depth: self.options.max_depth,
            });
        }
        self.resolution_chain.push(name.to_string());
        Ok(())
    }

    /// 从解析链中移除最近加入的组件
    pub fn pop(&mut self) {
        self.resolution_chain.pop();
    }

    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 构造循环依赖错误，链路从首次出现的位置开始
    pub fn cycle_error(&self, name: &str) -> DependencyError {
        let start = self
            .resolution_chain
            .iter()
            .position(|entry| entry == name)
            .unwrap_or(self.resolution_chain.len());
        let mut chain: Vec<&str> = self.resolution_chain[start..]
            .iter()
            .map(String::as_str)
            .collect();
        chain.push(name);
        DependencyError::CyclicDependency {
            chain: chain.join(" -> "),
        }
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}
