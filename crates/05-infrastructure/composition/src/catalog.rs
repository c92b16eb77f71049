//! 组件目录
//!
//! 进程级默认容器的显式替代：由调用方持有并传递，不使用全局可变状态

use di_abstractions::{Assertion, ComponentDefinition, ContainerConfig, Injectable};
use di_impl::Scope;
use infrastructure_common::{BoxError, DependencyResult, Environment};
use std::any::Any;
use tracing::{debug, info};

/// 组件目录
///
/// 收集组件定义与目录级断言，每次调用 [`ComponentCatalog::scope`] 都会得到一个
/// 拥有独立缓存的新作用域
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    definitions: Vec<ComponentDefinition>,
    assertions: Vec<Assertion>,
    config: ContainerConfig,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置派生作用域使用的容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 登记 [`Injectable`] 类型
    pub fn register<T: Injectable>(&mut self) -> &mut Self {
        self.register_definition(ComponentDefinition::of::<T>())
    }

    /// 登记组件定义，重名在创建作用域时报告
    pub fn register_definition(&mut self, definition: ComponentDefinition) -> &mut Self {
        debug!(component = %definition.name, "登记组件定义");
        self.definitions.push(definition);
        self
    }

    /// 登记目录级断言
    pub fn assert<T, E, F>(&mut self, name: impl Into<String>, predicate: F) -> &mut Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&T) -> Result<(), E> + Send + Sync + 'static,
    {
        self.assertions.push(Assertion::typed(name, predicate));
        self
    }

    /// 以目录内容创建作用域
    ///
    /// 先登记断言，再按登记顺序定义组件
    pub fn scope(&self, environment: Environment) -> DependencyResult<Scope> {
        let scope = Scope::with_config(environment, self.config.clone());
        for assertion in &self.assertions {
            scope.assert_instance(assertion.clone());
        }
        for definition in &self.definitions {
            scope.define_definition(definition)?;
        }
        info!(
            scope = %scope.id(),
            components = self.definitions.len(),
            assertions = self.assertions.len(),
            "从组件目录创建作用域"
        );
        Ok(scope)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// 按登记顺序返回组件名称
    pub fn component_names(&self) -> Vec<&str> {
        self.definitions
            .iter()
            .map(|definition| definition.name.as_str())
            .collect()
    }
}
