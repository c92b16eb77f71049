//! 元数据定义
//!
//! 提供已注册组件的只读描述信息

use serde::{Deserialize, Serialize};

/// 组件元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    /// 组件名称
    pub name: String,
    /// 按位置排列的依赖名称，`None` 表示该位置未绑定
    pub dependencies: Vec<Option<String>>,
    /// 当前作用域中是否已有缓存实例
    pub resolved: bool,
}

impl ComponentMetadata {
    /// 创建新的组件元数据
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            resolved: false,
        }
    }

    /// 设置依赖列表
    pub fn with_dependencies(mut self, dependencies: Vec<Option<String>>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// 设置解析状态
    pub fn with_resolved(mut self, resolved: bool) -> Self {
        self.resolved = resolved;
        self
    }

    /// 已绑定的依赖名称（跳过空位）
    pub fn bound_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().filter_map(|d| d.as_deref())
    }
}
