//! 组件解析
//!
//! 按名称查找注册信息，递归解析依赖，执行工厂、断言与环境绑定后写入实例槽。
//! 任何一步失败都不会缓存实例，之后的解析会从头重试

use crate::scope::Scope;
use di_abstractions::{Argument, Arguments, Assertion, EnvironmentBinding, Registration};
use infrastructure_common::{downcast_instance, DependencyError, DependencyResult, Instance};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, warn};

impl Scope {
    /// 按名称解析组件
    pub fn resolve_by_name(&self, name: &str) -> DependencyResult<Instance> {
        let registration = self.lookup(name).ok_or_else(|| {
            warn!(scope = %self.id, component = name, "组件不存在");
            DependencyError::UnknownComponent {
                name: name.to_string(),
            }
        })?;
        self.resolve_registration(&registration)
    }

    /// 解析并向下转换为具体类型
    pub fn resolve<T>(&self, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        downcast_instance::<T>(name, self.resolve_by_name(name)?)
    }

    fn resolve_registration(&self, registration: &Registration) -> DependencyResult<Instance> {
        if let Some(instance) = registration.instance() {
            debug!(scope = %self.id, component = registration.name(), "命中实例缓存");
            return Ok(instance);
        }

        let _guard = ConstructionGuard::enter(self, registration)?;
        debug!(scope = %self.id, component = registration.name(), "开始构建组件");

        let arguments = self.resolve_arguments(registration)?;
        let instance = registration.create(&arguments)?;
        self.run_assertions(registration.name(), &instance)?;
        self.run_bindings(registration.name(), &instance)?;

        debug!(scope = %self.id, component = registration.name(), "组件构建完成");
        Ok(registration.store(instance))
    }

    fn resolve_arguments(&self, registration: &Registration) -> DependencyResult<Arguments> {
        let mut slots = Vec::with_capacity(registration.dependencies().len());
        for dependency in registration.dependencies() {
            let Some(name) = dependency.name() else {
                slots.push(None);
                continue;
            };
            let target = self.lookup(name).ok_or_else(|| {
                warn!(
                    scope = %self.id,
                    component = registration.name(),
                    dependency = name,
                    "依赖组件不存在"
                );
                DependencyError::UnknownDependency {
                    owner: registration.name().to_string(),
                    dependency: name.to_string(),
                }
            })?;
            let instance = self.resolve_registration(&target)?;
            slots.push(Some(Argument {
                name: name.to_string(),
                instance,
            }));
        }
        Ok(Arguments::new(registration.name(), slots))
    }

    fn run_assertions(&self, name: &str, instance: &Instance) -> DependencyResult<()> {
        let assertions: Vec<Assertion> = self
            .assertions
            .read()
            .iter()
            .filter(|assertion| assertion.applies_to(name))
            .cloned()
            .collect();
        for assertion in &assertions {
            assertion.check(instance).map_err(|error| {
                warn!(scope = %self.id, component = name, error = %error, "组件断言失败");
                error
            })?;
        }
        Ok(())
    }

    fn run_bindings(&self, name: &str, instance: &Instance) -> DependencyResult<()> {
        let bindings: Vec<EnvironmentBinding> = self
            .bindings
            .read()
            .iter()
            .filter(|binding| binding.applies_to(name))
            .cloned()
            .collect();
        for binding in &bindings {
            binding.apply(&self.environment, instance).map_err(|error| {
                warn!(scope = %self.id, component = name, error = %error, "环境绑定失败");
                error
            })?;
        }
        Ok(())
    }
}

/// 构建标记守卫
///
/// 持有期间组件处于构建中并位于解析链上，离开作用域时两者都会清除
struct ConstructionGuard<'a> {
    scope: &'a Scope,
    registration: &'a Registration,
}

impl<'a> ConstructionGuard<'a> {
    fn enter(scope: &'a Scope, registration: &'a Registration) -> DependencyResult<Self> {
        let mut context = scope.context.lock();
        if !registration.begin_construction() {
            let error = context.cycle_error(registration.name());
            warn!(scope = %scope.id, error = %error, "检测到循环依赖");
            return Err(error);
        }
        if let Err(error) = context.push(registration.name()) {
            registration.end_construction();
            warn!(scope = %scope.id, error = %error, "组件解析中止");
            return Err(error);
        }
        Ok(Self {
            scope,
            registration,
        })
    }
}

impl Drop for ConstructionGuard<'_> {
    fn drop(&mut self) {
        self.scope.context.lock().pop();
        self.registration.end_construction();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::{ComponentRegistry, ContainerConfig};
    use infrastructure_common::{BoxError, Environment};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_resolve_passes_dependencies_by_position() {
        let scope = Scope::default();
        scope
            .define_value("Host", String::from("localhost"))
            .unwrap()
            .define_value("Port", 8080_u16)
            .unwrap()
            .define("Address", ["Host", "Port"], |arguments: &Arguments| {
                let host = arguments.get::<String>(0)?;
                let port = arguments.get::<u16>(1)?;
                Ok::<_, DependencyError>(format!("{host}:{port}"))
            })
            .unwrap();

        let address = scope.resolve::<String>("Address").unwrap();
        assert_eq!(address.as_str(), "localhost:8080");
    }

    #[test]
    fn test_singleton_per_scope() {
        let counter = Arc::new(AtomicUsize::new(0));
        let scope = Scope::default();
        let calls = Arc::clone(&counter);
        scope
            .define_factory("Counter", move || {
                Ok::<_, BoxError>(calls.fetch_add(1, Ordering::SeqCst))
            })
            .unwrap();

        let first = scope.resolve_by_name("Counter").unwrap();
        let second = scope.resolve_by_name("Counter").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(scope.is_resolved("Counter"));
    }

    #[test]
    fn test_gap_is_passed_as_none() {
        let scope = Scope::default();
        scope.define_value("B", 2_i32).unwrap();
        scope
            .define("A", [None, Some("B")], |arguments: &Arguments| {
                let first: Option<Arc<i32>> = arguments.extract(0)?;
                let second: Arc<i32> = arguments.extract(1)?;
                Ok::<_, DependencyError>((first.is_none(), *second))
            })
            .unwrap();

        assert_eq!(*scope.resolve::<(bool, i32)>("A").unwrap(), (true, 2));
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let scope = Scope::default();
        scope
            .define("A", ["A"], |_: &Arguments| Ok::<_, BoxError>(()))
            .unwrap();

        let error = scope.resolve_by_name("A").unwrap_err();
        assert!(matches!(error, DependencyError::CyclicDependency { ref chain } if chain == "A -> A"));
        assert!(!scope.is_resolved("A"));
    }

    #[test]
    fn test_guard_clears_marks_after_failure() {
        let scope = Scope::default();
        scope
            .define("A", ["Missing"], |_: &Arguments| Ok::<_, BoxError>(()))
            .unwrap();

        assert!(scope.resolve_by_name("A").is_err());
        assert_eq!(scope.context.lock().depth(), 0);
        assert!(!scope.lookup("A").unwrap().is_in_progress());
    }

    #[test]
    fn test_depth_limit_from_config() {
        let scope = Scope::with_config(
            Environment::new(),
            ContainerConfig {
                max_resolution_depth: 2,
            },
        );
        scope
            .define_value("C", ())
            .unwrap()
            .define_alias("B", "C")
            .unwrap()
            .define_alias("A", "B")
            .unwrap();

        let error = scope.resolve_by_name("A").unwrap_err();
        assert!(matches!(
            error,
            DependencyError::ResolutionDepthExceeded { ref name, max_depth: 2 } if name == "C"
        ));
        assert!(scope.fork(Environment::new()).resolve_by_name("B").is_ok());
    }
}
