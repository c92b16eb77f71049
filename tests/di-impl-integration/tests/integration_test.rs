//! Centralized integration tests for di-impl crate
use di_abstractions::{
    Arguments, Assertion, ComponentRegistry, ComponentResolver, ContainerConfig, DiContainer,
    EnvironmentBinding,
};
use di_impl::Scope;
use infrastructure_common::{BoxError, DependencyError, Environment, Instance};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// 测试组件
#[derive(Debug)]
struct TestService {
    name: String,
}

impl TestService {
    fn get_name(&self) -> &str {
        &self.name
    }
}

/// 菱形依赖：Top -> (Left, Right) -> Shared
fn diamond(counter: &Arc<AtomicUsize>) -> Scope {
    let scope = Scope::default();
    let calls = Arc::clone(counter);
    scope
        .define_factory("Shared", move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, BoxError>(TestService {
                name: "shared".to_string(),
            })
        })
        .unwrap()
        .define("Left", ["Shared"], |arguments: &Arguments| arguments.get::<TestService>(0))
        .unwrap()
        .define("Right", ["Shared"], |arguments: &Arguments| arguments.get::<TestService>(0))
        .unwrap()
        .define("Top", ["Left", "Right"], |arguments: &Arguments| {
            let left = arguments.get::<Arc<TestService>>(0)?;
            let right = arguments.get::<Arc<TestService>>(1)?;
            Ok::<_, DependencyError>(Arc::ptr_eq(&*left, &*right))
        })
        .unwrap();
    scope
}

#[test]
fn test_diamond_shares_transitive_singleton() -> anyhow::Result<()> {
    let counter = Arc::new(AtomicUsize::new(0));
    let scope = diamond(&counter);

    let shared_by_both = scope.resolve::<bool>("Top")?;
    assert!(*shared_by_both);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(scope.resolve::<TestService>("Shared")?.get_name(), "shared");
    Ok(())
}

#[test]
fn test_failed_dependency_leaves_siblings_cached() {
    let scope = Scope::default();
    scope
        .define_value("Good", 1_u8)
        .unwrap()
        .define_factory("Bad", || Err::<u8, _>("boom"))
        .unwrap()
        .define("Root", ["Good", "Bad"], |_: &Arguments| Ok::<_, BoxError>(()))
        .unwrap();

    let error = scope.resolve_by_name("Root").unwrap_err();
    assert!(matches!(error, DependencyError::ComponentCreationFailed { ref name, .. } if name == "Bad"));
    assert!(scope.is_resolved("Good"));
    assert!(!scope.is_resolved("Bad"));
    assert!(!scope.is_resolved("Root"));
}

#[test]
fn test_cycle_marks_cleared_for_unrelated_resolution() {
    let scope = Scope::default();
    scope
        .define("A", ["B"], |_: &Arguments| Ok::<_, BoxError>(()))
        .unwrap()
        .define("B", ["A"], |_: &Arguments| Ok::<_, BoxError>(()))
        .unwrap()
        .define_value("C", 3_i32)
        .unwrap();

    let error = scope.resolve_by_name("A").unwrap_err();
    assert_eq!(error.to_string(), "检测到循环依赖: A -> B -> A");
    assert_eq!(error.component(), "A");
    assert_eq!(*scope.resolve::<i32>("C").unwrap(), 3);
}

#[test]
fn test_hooks_through_container_trait() {
    fn install<C: DiContainer>(container: &C) {
        container.add_assertion(Assertion::new(
            "Port",
            Arc::new(|instance: &Instance| -> Result<(), BoxError> {
                match instance.downcast_ref::<u16>() {
                    Some(port) if *port > 0 => Ok(()),
                    _ => Err("invalid port".into()),
                }
            }),
        ));
        container.add_binding(EnvironmentBinding::new(
            "Port",
            Arc::new(|environment: &Environment, instance: &Instance| -> Result<(), BoxError> {
                environment.insert_instance("port", Arc::clone(instance));
                Ok(())
            }),
        ));
    }

    let scope = Scope::default();
    scope.define_value("Port", 8080_u16).unwrap();
    install(&scope);

    scope.resolve_by_name("Port").unwrap();
    assert_eq!(*scope.environment().get::<u16>("port").unwrap().unwrap(), 8080);
}

#[test]
fn test_fork_of_fork_keeps_templates() {
    let counter = Arc::new(AtomicUsize::new(0));
    let scope = diamond(&counter);

    let child = scope.fork(Environment::new().with("level", 1_u8));
    let grandchild = child.fork(Environment::new().with("level", 2_u8));

    assert!(*grandchild.resolve::<bool>("Top").unwrap());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(!child.is_resolved("Top"));
    assert_eq!(*grandchild.environment().get::<u8>("level").unwrap().unwrap(), 2);
    assert_eq!(grandchild.registered_components().len(), 4);
}

#[test]
fn test_config_from_toml_limits_depth() {
    let config: ContainerConfig = toml::from_str("max_resolution_depth = 1").unwrap();
    let scope = Scope::with_config(Environment::new(), config);
    scope
        .define_value("Leaf", ())
        .unwrap()
        .define_alias("Root", "Leaf")
        .unwrap();

    assert!(matches!(
        scope.resolve_by_name("Root").unwrap_err(),
        DependencyError::ResolutionDepthExceeded { max_depth: 1, .. }
    ));
    assert!(scope.resolve_by_name("Leaf").is_ok());
    assert!(scope.resolve_by_name("Root").is_ok());
}

#[test]
fn test_scope_moves_across_threads() {
    let scope = Arc::new(Scope::default());
    scope
        .define_value("Config", serde_json::json!({ "workers": 4 }))
        .unwrap();

    let worker = {
        let scope = Arc::clone(&scope);
        thread::spawn(move || scope.resolve::<serde_json::Value>("Config").map(|value| value["workers"].as_u64()))
    };

    let workers = worker.join().unwrap().unwrap();
    assert_eq!(workers, Some(4));
    assert!(scope.is_resolved("Config"));
}

#[test]
fn test_registry_and_resolver_traits() {
    let scope = Scope::default();
    let registration = di_abstractions::ComponentDefinition::new(
        "Erased",
        Vec::new(),
        Arc::new(|_: &Arguments| -> Result<Instance, BoxError> {
            Ok(Arc::new(TestService {
                name: "erased".to_string(),
            }))
        }),
    )
    .to_registration();

    ComponentRegistry::register(&scope, registration).unwrap();
    assert!(scope.can_resolve("Erased"));
    let service = ComponentResolver::resolve::<TestService>(&scope, "Erased").unwrap();
    assert_eq!(service.get_name(), "erased");
}
