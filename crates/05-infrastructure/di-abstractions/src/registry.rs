//! 组件注册表抽象接口

use crate::factory::Arguments;
use infrastructure_common::{
    BoxError, ComponentMetadata, DependencyError, DependencyResult, Instance,
};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 组件注册表 trait
///
/// 以名称为键保存组件注册信息
pub trait ComponentRegistry: Send + Sync {
    /// 插入注册信息，名称重复时失败
    fn register(&self, registration: Registration) -> DependencyResult<()>;

    /// 检查组件是否已注册
    fn is_registered(&self, name: &str) -> bool;

    /// 检查组件是否已有缓存实例
    fn is_resolved(&self, name: &str) -> bool;

    /// 获取所有已注册组件的元数据，按名称排序
    fn registered_components(&self) -> Vec<ComponentMetadata>;
}

/// 组件工厂函数类型
///
/// 参数与注册时声明的依赖按位置一一对应
pub type ComponentFactoryFn =
    Arc<dyn Fn(&Arguments) -> Result<Instance, BoxError> + Send + Sync>;

/// 依赖列表中的一个位置
///
/// 要么是组件名称，要么是未绑定的空位
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency(Option<String>);

impl Dependency {
    /// 按名称绑定的依赖
    pub fn named(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }

    /// 未绑定的空位，解析时传入 `None`
    pub fn gap() -> Self {
        Self(None)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_gap(&self) -> bool {
        self.0.is_none()
    }
}

impl From<&str> for Dependency {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for Dependency {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl From<&String> for Dependency {
    fn from(name: &String) -> Self {
        Self::named(name.as_str())
    }
}

impl From<Option<&str>> for Dependency {
    fn from(name: Option<&str>) -> Self {
        Self(name.map(str::to_string))
    }
}

impl From<Option<String>> for Dependency {
    fn from(name: Option<String>) -> Self {
        Self(name)
    }
}

/// 组件注册信息
///
/// 实例槽只会被写入一次，写入后在作用域生命周期内不再改变
pub struct Registration {
    name: String,
    dependencies: Vec<Dependency>,
    factory: ComponentFactoryFn,
    instance: OnceCell<Instance>,
    in_progress: AtomicBool,
}

impl Registration {
    /// 创建新的注册信息，实例槽为空
    pub fn new(
        name: impl Into<String>,
        dependencies: Vec<Dependency>,
        factory: ComponentFactoryFn,
    ) -> Self {
        Self {
            name: name.into(),
            dependencies,
            factory,
            instance: OnceCell::new(),
            in_progress: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// 复制名称、依赖与工厂，实例槽重置为空
    pub fn template(&self) -> Self {
        Self::new(
            self.name.clone(),
            self.dependencies.clone(),
            Arc::clone(&self.factory),
        )
    }

    /// 已缓存的实例
    pub fn instance(&self) -> Option<Instance> {
        self.instance.get().cloned()
    }

    pub fn is_resolved(&self) -> bool {
        self.instance.get().is_some()
    }

    /// 写入实例槽并返回最终缓存的实例
    pub fn store(&self, instance: Instance) -> Instance {
        Arc::clone(self.instance.get_or_init(|| instance))
    }

    /// 调用工厂创建新实例
    pub fn create(&self, arguments: &Arguments) -> DependencyResult<Instance> {
        (self.factory)(arguments).map_err(|source| DependencyError::ComponentCreationFailed {
            name: self.name.clone(),
            source,
        })
    }

    /// 标记为正在构建，已处于构建中时返回 `false`
    pub fn begin_construction(&self) -> bool {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 清除构建标记
    pub fn end_construction(&self) {
        self.in_progress.store(false, Ordering::Release);
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// 生成元数据快照
    pub fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata::new(self.name.clone())
            .with_dependencies(
                self.dependencies
                    .iter()
                    .map(|d| d.name().map(str::to_string))
                    .collect(),
            )
            .with_resolved(self.is_resolved())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("resolved", &self.is_resolved())
            .field("in_progress", &self.is_in_progress())
            .field("factory", &"<function>")
            .finish()
    }
}
