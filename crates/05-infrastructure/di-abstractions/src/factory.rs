//! 组件工厂抽象接口
//!
//! 提供工厂参数、类型化工厂包装以及注解适配器使用的 [`Injectable`] 约定

use crate::registry::{ComponentFactoryFn, Dependency, Registration};
use infrastructure_common::{
    downcast_instance, into_instance, BoxError, DependencyError, DependencyResult, Instance,
};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::sync::Arc;

/// 已解析的单个依赖
#[derive(Clone)]
pub struct Argument {
    /// 依赖组件名称
    pub name: String,
    /// 依赖实例
    pub instance: Instance,
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argument")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// 传递给工厂的位置参数
///
/// 与依赖列表按下标对齐，空位对应 `None`
#[derive(Debug, Clone)]
pub struct Arguments {
    owner: String,
    slots: Vec<Option<Argument>>,
}

impl Arguments {
    pub fn new(owner: impl Into<String>, slots: Vec<Option<Argument>>) -> Self {
        Self {
            owner: owner.into(),
            slots,
        }
    }

    /// 无参数调用
    pub fn empty(owner: impl Into<String>) -> Self {
        Self::new(owner, Vec::new())
    }

    /// 正在构建的组件名称
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 指定位置的原始实例，空位或越界时为 `None`
    pub fn instance(&self, index: usize) -> Option<&Instance> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .map(|argument| &argument.instance)
    }

    /// 指定位置的依赖名称
    pub fn dependency_name(&self, index: usize) -> Option<&str> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .map(|argument| argument.name.as_str())
    }

    /// 按位置迭代原始实例
    pub fn iter(&self) -> impl Iterator<Item = Option<&Instance>> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(|argument| &argument.instance))
    }

    /// 取出指定位置并向下转换
    pub fn get<T>(&self, index: usize) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let argument = self
            .slots
            .get(index)
            .and_then(Option::as_ref)
            .ok_or_else(|| DependencyError::MissingArgument {
                owner: self.owner.clone(),
                index,
            })?;
        downcast_instance::<T>(&argument.name, Arc::clone(&argument.instance))
    }

    /// 将指定位置的 JSON 值反序列化为配置类型
    pub fn deserialize<T>(&self, index: usize) -> DependencyResult<T>
    where
        T: DeserializeOwned,
    {
        let value = self.get::<serde_json::Value>(index)?;
        T::deserialize(&*value).map_err(|source| DependencyError::ArgumentDeserialization {
            owner: self.owner.clone(),
            index,
            source,
        })
    }

    /// 按 [`FromArgument`] 约定提取
    pub fn extract<A>(&self, index: usize) -> DependencyResult<A>
    where
        A: FromArgument,
    {
        A::from_argument(self, index)
    }
}

/// 可以从工厂参数中提取的类型
pub trait FromArgument: Sized {
    fn from_argument(arguments: &Arguments, index: usize) -> DependencyResult<Self>;
}

impl<T> FromArgument for Arc<T>
where
    T: Any + Send + Sync,
{
    fn from_argument(arguments: &Arguments, index: usize) -> DependencyResult<Self> {
        arguments.get::<T>(index)
    }
}

/// 空位提取为 `None`，类型不匹配仍然报错
impl<T> FromArgument for Option<Arc<T>>
where
    T: Any + Send + Sync,
{
    fn from_argument(arguments: &Arguments, index: usize) -> DependencyResult<Self> {
        match arguments.instance(index) {
            Some(_) => arguments.get::<T>(index).map(Some),
            None => Ok(None),
        }
    }
}

/// 将类型化工厂包装为 [`ComponentFactoryFn`]
pub fn erase_factory<T, E, F>(factory: F) -> ComponentFactoryFn
where
    T: Any + Send + Sync,
    E: Into<BoxError>,
    F: Fn(&Arguments) -> Result<T, E> + Send + Sync + 'static,
{
    Arc::new(move |arguments: &Arguments| -> Result<Instance, BoxError> {
        factory(arguments).map(into_instance).map_err(Into::into)
    })
}

/// 可注入组件 trait
///
/// 由 `#[derive(Injectable)]` 生成：组件名称、按位置排列的依赖，以及从参数构造实例的方法
pub trait Injectable: Any + Send + Sync + Sized {
    /// 组件名称
    fn component_name() -> &'static str;

    /// 按构造位置排列的依赖
    fn dependencies() -> Vec<Dependency>;

    /// 使用已解析的依赖构造实例
    fn construct(arguments: &Arguments) -> DependencyResult<Self>;
}

/// 组件定义
///
/// 与一次 `define` 调用等价的数据：名称、依赖列表与工厂
#[derive(Clone)]
pub struct ComponentDefinition {
    /// 组件名称
    pub name: String,
    /// 依赖列表
    pub dependencies: Vec<Dependency>,
    /// 组件工厂
    pub factory: ComponentFactoryFn,
}

impl ComponentDefinition {
    pub fn new(
        name: impl Into<String>,
        dependencies: Vec<Dependency>,
        factory: ComponentFactoryFn,
    ) -> Self {
        Self {
            name: name.into(),
            dependencies,
            factory,
        }
    }

    /// 从 [`Injectable`] 实现生成定义
    pub fn of<T: Injectable>() -> Self {
        Self::new(
            T::component_name(),
            T::dependencies(),
            erase_factory(|arguments: &Arguments| T::construct(arguments)),
        )
    }

    /// 生成实例槽为空的注册信息
    pub fn to_registration(&self) -> Registration {
        Registration::new(
            self.name.clone(),
            self.dependencies.clone(),
            Arc::clone(&self.factory),
        )
    }
}

impl std::fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("factory", &"<function>")
            .finish()
    }
}
