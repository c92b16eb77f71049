//! 作用域容器
//!
//! 持有注册表、断言、环境绑定与宿主环境，支持派生子作用域

use di_abstractions::{
    erase_factory, Arguments, Assertion, ComponentDefinition, ComponentRegistry,
    ComponentResolver, ContainerConfig, Dependency, DiContainer, EnvironmentBinding, Injectable,
    Registration, ResolveContext,
};
use infrastructure_common::{
    BoxError, ComponentMetadata, DependencyError, DependencyResult, Environment, Instance,
};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 作用域
///
/// 组件在所属作用域内按名称单例缓存。所有操作都通过共享引用完成，
/// 工厂与钩子执行期间不持有任何锁，因此可以回调作用域自身
pub struct Scope {
    pub(crate) id: Uuid,
    pub(crate) environment: Environment,
    pub(crate) registrations: RwLock<HashMap<String, Arc<Registration>>>,
    pub(crate) assertions: RwLock<Vec<Assertion>>,
    pub(crate) bindings: RwLock<Vec<EnvironmentBinding>>,
    pub(crate) context: Mutex<ResolveContext>,
    pub(crate) config: ContainerConfig,
}

impl Scope {
    /// 以指定宿主环境创建作用域
    pub fn new(environment: Environment) -> Self {
        Self::with_config(environment, ContainerConfig::default())
    }

    /// 以指定环境与配置创建作用域
    pub fn with_config(environment: Environment, config: ContainerConfig) -> Self {
        let id = Uuid::new_v4();
        debug!(scope = %id, "创建作用域");
        Self {
            id,
            environment,
            registrations: RwLock::new(HashMap::new()),
            assertions: RwLock::new(Vec::new()),
            bindings: RwLock::new(Vec::new()),
            context: Mutex::new(ResolveContext::new(config.resolve_options())),
            config,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 宿主环境
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// 定义组件
    ///
    /// `dependencies[i]` 解析后作为工厂的第 i 个参数。名称重复时返回
    /// [`DependencyError::DuplicateRegistration`]，不会调用工厂
    pub fn define<D, T, E, F>(
        &self,
        name: impl Into<String>,
        dependencies: D,
        factory: F,
    ) -> DependencyResult<&Self>
    where
        D: IntoIterator,
        D::Item: Into<Dependency>,
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&Arguments) -> Result<T, E> + Send + Sync + 'static,
    {
        let dependencies = dependencies.into_iter().map(Into::into).collect();
        self.insert(Registration::new(name, dependencies, erase_factory(factory)))?;
        Ok(self)
    }

    /// 定义无依赖的组件
    pub fn define_factory<T, E, F>(&self, name: impl Into<String>, factory: F) -> DependencyResult<&Self>
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        self.define(name, Vec::<Dependency>::new(), move |_: &Arguments| factory())
    }

    /// 定义值组件，每次解析得到同一个实例
    pub fn define_value<T>(&self, name: impl Into<String>, value: T) -> DependencyResult<&Self>
    where
        T: Any + Send + Sync,
    {
        let instance: Instance = Arc::new(value);
        self.insert(Registration::new(
            name,
            Vec::new(),
            Arc::new(move |_: &Arguments| -> Result<Instance, BoxError> {
                Ok(Arc::clone(&instance))
            }),
        ))?;
        Ok(self)
    }

    /// 定义别名组件，解析结果与 `target` 是同一个实例
    pub fn define_alias(
        &self,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> DependencyResult<&Self> {
        self.insert(Registration::new(
            name,
            vec![Dependency::named(target)],
            Arc::new(|arguments: &Arguments| -> Result<Instance, BoxError> {
                arguments.instance(0).cloned().ok_or_else(|| {
                    DependencyError::MissingArgument {
                        owner: arguments.owner().to_string(),
                        index: 0,
                    }
                    .into()
                })
            }),
        ))?;
        Ok(self)
    }

    /// 按组件定义注册
    pub fn define_definition(&self, definition: &ComponentDefinition) -> DependencyResult<&Self> {
        self.insert(definition.to_registration())?;
        Ok(self)
    }

    /// 注册 [`Injectable`] 类型
    pub fn define_injectable<T: Injectable>(&self) -> DependencyResult<&Self> {
        self.define_definition(&ComponentDefinition::of::<T>())
    }

    /// 登记断言，可以先于组件定义
    pub fn assert<T, E, F>(&self, name: impl Into<String>, predicate: F) -> &Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&T) -> Result<(), E> + Send + Sync + 'static,
    {
        self.assert_instance(Assertion::typed(name, predicate))
    }

    /// 登记已擦除类型的断言
    pub fn assert_instance(&self, assertion: Assertion) -> &Self {
        debug!(scope = %self.id, component = assertion.name(), "登记断言");
        self.assertions.write().push(assertion);
        self
    }

    /// 登记环境绑定，可以先于组件定义
    pub fn bind<T, E, F>(&self, name: impl Into<String>, effect: F) -> &Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&Environment, Arc<T>) -> Result<(), E> + Send + Sync + 'static,
    {
        self.bind_instance(EnvironmentBinding::typed(name, effect))
    }

    /// 登记已擦除类型的环境绑定
    pub fn bind_instance(&self, binding: EnvironmentBinding) -> &Self {
        debug!(scope = %self.id, component = binding.name(), "登记环境绑定");
        self.bindings.write().push(binding);
        self
    }

    /// 派生子作用域
    ///
    /// 复制每个注册的名称、依赖与工厂并重置实例槽；断言与绑定共享同一组函数，
    /// 但在子作用域中独立执行；环境为父环境与 `overrides` 的合并，`overrides` 优先
    pub fn fork(&self, overrides: Environment) -> Scope {
        let registrations: HashMap<String, Arc<Registration>> = self
            .registrations
            .read()
            .iter()
            .map(|(name, registration)| (name.clone(), Arc::new(registration.template())))
            .collect();
        let child = Scope {
            id: Uuid::new_v4(),
            environment: self.environment.merged(&overrides),
            registrations: RwLock::new(registrations),
            assertions: RwLock::new(self.assertions.read().clone()),
            bindings: RwLock::new(self.bindings.read().clone()),
            context: Mutex::new(ResolveContext::new(self.config.resolve_options())),
            config: self.config.clone(),
        };
        info!(
            scope = %self.id,
            child = %child.id,
            components = child.registrations.read().len(),
            "派生子作用域"
        );
        child
    }

    /// 已注册组件数量
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<Arc<Registration>> {
        self.registrations.read().get(name).cloned()
    }

    fn insert(&self, registration: Registration) -> DependencyResult<()> {
        let mut registrations = self.registrations.write();
        if registrations.contains_key(registration.name()) {
            warn!(scope = %self.id, component = registration.name(), "组件重复注册");
            return Err(DependencyError::DuplicateRegistration {
                name: registration.name().to_string(),
            });
        }
        info!(
            scope = %self.id,
            component = registration.name(),
            dependencies = registration.dependencies().len(),
            "注册组件"
        );
        registrations.insert(registration.name().to_string(), Arc::new(registration));
        Ok(())
    }

    /// 组件及其传递依赖是否都已注册且不构成循环
    ///
    /// `visiting` 为当前路径，`visited` 为已确认可解析的组件
    fn dependencies_resolvable(
        &self,
        name: &str,
        visiting: &mut HashSet<String>,
        visited: &mut HashSet<String>,
    ) -> bool {
        if visited.contains(name) {
            return true;
        }
        let Some(registration) = self.lookup(name) else {
            return false;
        };
        if registration.is_resolved() {
            return true;
        }
        if !visiting.insert(name.to_string()) {
            return false;
        }
        let resolvable = registration
            .dependencies()
            .iter()
            .filter_map(Dependency::name)
            .all(|dependency| self.dependencies_resolvable(dependency, visiting, visited));
        visiting.remove(name);
        if resolvable {
            visited.insert(name.to_string());
        }
        resolvable
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new(Environment::new())
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.registrations.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("components", &names)
            .field("assertions", &self.assertions.read().len())
            .field("bindings", &self.bindings.read().len())
            .field("environment", &self.environment)
            .finish()
    }
}

impl ComponentRegistry for Scope {
    fn register(&self, registration: Registration) -> DependencyResult<()> {
        self.insert(registration)
    }

    fn is_registered(&self, name: &str) -> bool {
        self.registrations.read().contains_key(name)
    }

    fn is_resolved(&self, name: &str) -> bool {
        self.lookup(name)
            .map(|registration| registration.is_resolved())
            .unwrap_or(false)
    }

    fn registered_components(&self) -> Vec<ComponentMetadata> {
        let mut components: Vec<ComponentMetadata> = self
            .registrations
            .read()
            .values()
            .map(|registration| registration.metadata())
            .collect();
        components.sort_by(|a, b| a.name.cmp(&b.name));
        components
    }
}

impl ComponentResolver for Scope {
    fn resolve_by_name(&self, name: &str) -> DependencyResult<Instance> {
        Scope::resolve_by_name(self, name)
    }

    fn can_resolve(&self, name: &str) -> bool {
        self.dependencies_resolvable(name, &mut HashSet::new(), &mut HashSet::new())
    }
}

impl DiContainer for Scope {
    fn add_assertion(&self, assertion: Assertion) {
        self.assert_instance(assertion);
    }

    fn add_binding(&self, binding: EnvironmentBinding) {
        self.bind_instance(binding);
    }

    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn fork(&self, overrides: Environment) -> Self {
        Scope::fork(self, overrides)
    }
}
