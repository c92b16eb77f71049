//! Centralized integration tests for component-macros crate

use component_macros::Injectable;
use di_abstractions::{ComponentDefinition, Injectable};
use di_impl::Scope;
use infrastructure_common::{DependencyError, Environment};
use infrastructure_composition::{start, ComponentCatalog, InstanceOptions, StartOptions};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct TestServiceConfig {
    pub enabled: bool,
    pub timeout: u64,
}

#[derive(Debug, Injectable)]
pub struct CacheService {
    #[inject(config = "CacheConfig")]
    config: TestServiceConfig,
}

#[derive(Debug, Injectable)]
#[component(name = "TestService")]
pub struct TestService {
    #[inject("ICache")]
    cache: Arc<CacheService>,
    #[inject(config = "Metrics")]
    metrics: Option<String>,
    requests: u64,
}

#[derive(Debug, Injectable)]
pub struct Reporter {
    #[inject("ICache")]
    cache: Arc<CacheService>,
    #[inject(gap)]
    sink: Option<Arc<String>>,
}

#[derive(Debug, Injectable)]
pub struct Loop(#[inject("Loop")] Arc<u8>);

fn scope_with_cache() -> Scope {
    let scope = Scope::default();
    scope
        .define_injectable::<CacheService>()
        .unwrap()
        .define_injectable::<TestService>()
        .unwrap()
        .define_value("CacheConfig", json!({ "enabled": true, "timeout": 30 }))
        .unwrap()
        .define_alias("ICache", "CacheService")
        .unwrap()
        .define_value("Metrics", json!("prometheus"))
        .unwrap();
    scope
}

#[test]
fn test_derived_definition_matches_explicit_define() {
    let definition = ComponentDefinition::of::<TestService>();

    assert_eq!(definition.name, "TestService");
    assert_eq!(definition.dependencies, TestService::dependencies());
    assert_eq!(definition.dependencies.len(), 3);
    assert_eq!(definition.dependencies[0].name(), Some("ICache"));
    assert_eq!(definition.dependencies[1].name(), Some("Metrics"));
    assert!(definition.dependencies[2].is_gap());
}

#[test]
fn test_scope_builds_derived_graph() {
    let scope = scope_with_cache();

    let service = scope.resolve::<TestService>("TestService").unwrap();
    let cache = scope.resolve::<CacheService>("CacheService").unwrap();

    assert!(Arc::ptr_eq(&service.cache, &cache));
    assert!(cache.config.enabled);
    assert_eq!(cache.config.timeout, 30);
    assert_eq!(service.metrics.as_deref(), Some("prometheus"));
    assert_eq!(service.requests, 0);
}

#[test]
fn test_explicit_gap_resolves_to_none() {
    let scope = scope_with_cache();
    scope.define_injectable::<Reporter>().unwrap();

    assert!(Reporter::dependencies()[1].is_gap());
    let reporter = scope.resolve::<Reporter>("Reporter").unwrap();
    let cache = scope.resolve::<CacheService>("CacheService").unwrap();
    assert!(Arc::ptr_eq(&reporter.cache, &cache));
    assert!(reporter.sink.is_none());
}

#[test]
fn test_bound_dependency_must_be_registered() {
    let scope = Scope::default();
    scope.define_injectable::<TestService>().unwrap();

    let error = scope.resolve_by_name("TestService").unwrap_err();
    assert!(matches!(
        error,
        DependencyError::UnknownDependency { ref owner, ref dependency }
            if owner == "TestService" && dependency == "ICache"
    ));
}

#[test]
fn test_derived_self_dependency_is_cycle() {
    let scope = Scope::default();
    scope.define_injectable::<Loop>().unwrap();

    assert!(matches!(
        scope.resolve_by_name("Loop").unwrap_err(),
        DependencyError::CyclicDependency { .. }
    ));
}

#[test]
fn test_catalog_and_start() {
    let mut catalog = ComponentCatalog::new();
    catalog
        .register::<CacheService>()
        .register::<TestService>()
        .assert("CacheService", |cache: &CacheService| {
            if cache.config.timeout > 0 {
                Ok(())
            } else {
                Err("timeout must be positive")
            }
        });

    let options = StartOptions::new().with_instance(
        "TestService",
        InstanceOptions::new()
            .with_option("CacheConfig", json!({ "enabled": false, "timeout": 5 }))
            .with_option("Metrics", json!("statsd"))
            .with_binding("ICache", "CacheService"),
    );

    let instances = start(&catalog, &options).unwrap();
    assert_eq!(instances.len(), 1);
    let service = instances[0].1.downcast_ref::<TestService>().unwrap();
    assert!(!service.cache.config.enabled);
    assert_eq!(service.metrics.as_deref(), Some("statsd"));
    assert_eq!(catalog.component_names(), vec!["CacheService", "TestService"]);
}

#[test]
fn test_catalog_assertion_rejects_value() {
    let mut catalog = ComponentCatalog::new();
    catalog
        .register::<CacheService>()
        .assert("CacheService", |cache: &CacheService| {
            if cache.config.timeout > 0 {
                Ok(())
            } else {
                Err("timeout must be positive")
            }
        });

    let scope = catalog.scope(Environment::new()).unwrap();
    scope
        .define_value("CacheConfig", json!({ "enabled": true, "timeout": 0 }))
        .unwrap();

    assert!(matches!(
        scope.resolve_by_name("CacheService").unwrap_err(),
        DependencyError::AssertionFailure { ref name, .. } if name == "CacheService"
    ));
}
