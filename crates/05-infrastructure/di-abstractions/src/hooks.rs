//! 构造后钩子
//!
//! 断言与环境绑定按组件名称登记，在解析时才与注册信息匹配

use infrastructure_common::{
    downcast_instance, BoxError, DependencyError, DependencyResult, Environment, Instance,
};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 断言函数类型
pub type AssertFn = Arc<dyn Fn(&Instance) -> Result<(), BoxError> + Send + Sync>;

/// 环境绑定函数类型
pub type BindFn = Arc<dyn Fn(&Environment, &Instance) -> Result<(), BoxError> + Send + Sync>;

/// 组件断言
///
/// 在实例创建后、缓存前执行，失败时实例被丢弃
#[derive(Clone)]
pub struct Assertion {
    name: String,
    predicate: AssertFn,
}

impl Assertion {
    pub fn new(name: impl Into<String>, predicate: AssertFn) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }

    /// 针对具体类型的断言，实例类型不符时断言失败
    pub fn typed<T, E, F>(name: impl Into<String>, predicate: F) -> Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&T) -> Result<(), E> + Send + Sync + 'static,
    {
        let name = name.into();
        let owner = name.clone();
        Self::new(
            name,
            Arc::new(move |instance: &Instance| -> Result<(), BoxError> {
                let typed = downcast_instance::<T>(&owner, Arc::clone(instance))?;
                predicate(&typed).map_err(Into::into)
            }),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn applies_to(&self, component: &str) -> bool {
        self.name == component
    }

    /// 执行断言，错误包装组件名称
    pub fn check(&self, instance: &Instance) -> DependencyResult<()> {
        (self.predicate)(instance).map_err(|source| DependencyError::AssertionFailure {
            name: self.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("name", &self.name)
            .field("predicate", &"<function>")
            .finish()
    }
}

/// 环境绑定
///
/// 把已通过断言的实例写入宿主环境，是副作用而不是返回值
#[derive(Clone)]
pub struct EnvironmentBinding {
    name: String,
    effect: BindFn,
}

impl EnvironmentBinding {
    pub fn new(name: impl Into<String>, effect: BindFn) -> Self {
        Self {
            name: name.into(),
            effect,
        }
    }

    /// 针对具体类型的绑定
    pub fn typed<T, E, F>(name: impl Into<String>, effect: F) -> Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&Environment, Arc<T>) -> Result<(), E> + Send + Sync + 'static,
    {
        let name = name.into();
        let owner = name.clone();
        Self::new(
            name,
            Arc::new(move |environment: &Environment, instance: &Instance| -> Result<(), BoxError> {
                let typed = downcast_instance::<T>(&owner, Arc::clone(instance))?;
                effect(environment, typed).map_err(Into::into)
            }),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn applies_to(&self, component: &str) -> bool {
        self.name == component
    }

    /// 执行绑定，错误包装组件名称
    pub fn apply(&self, environment: &Environment, instance: &Instance) -> DependencyResult<()> {
        (self.effect)(environment, instance).map_err(|source| DependencyError::BindingFailure {
            name: self.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for EnvironmentBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentBinding")
            .field("name", &self.name)
            .field("effect", &"<function>")
            .finish()
    }
}
