//! 基础设施启动器

use crate::catalog::ComponentCatalog;
use crate::logging::{init_logging, LoggingConfig};
use crate::options::{InstanceOptions, StartOptions};
use di_impl::Scope;
use infrastructure_common::{Environment, Instance, InfrastructureResult};
use std::path::Path;
use tracing::{error, info};

/// 按启动配置解析根组件
///
/// 每个实例名称使用一个新作用域：先把 `options` 定义为值组件，再把 `bindings`
/// 定义为别名，最后解析实例名称本身。结果按配置顺序返回
pub fn start(
    catalog: &ComponentCatalog,
    options: &StartOptions,
) -> InfrastructureResult<Vec<(String, Instance)>> {
    start_with_environment(catalog, options, &Environment::new())
}

/// 与 [`start`] 相同，但每个作用域以 `environment` 的副本作为宿主环境
pub fn start_with_environment(
    catalog: &ComponentCatalog,
    options: &StartOptions,
    environment: &Environment,
) -> InfrastructureResult<Vec<(String, Instance)>> {
    info!(instances = options.len(), "开始启动实例");
    let mut instances = Vec::with_capacity(options.len());
    for (name, instance_options) in options.iter() {
        let instance = start_instance(catalog, name, instance_options, environment)
            .map_err(|e| {
                error!(instance = name, error = %e, "实例启动失败");
                e
            })?;
        instances.push((name.to_string(), instance));
    }
    info!(instances = instances.len(), "实例启动完成");
    Ok(instances)
}

fn start_instance(
    catalog: &ComponentCatalog,
    name: &str,
    instance_options: &InstanceOptions,
    environment: &Environment,
) -> InfrastructureResult<Instance> {
    let scope = catalog.scope(environment.clone())?;
    configure_scope(&scope, instance_options)?;
    let instance = scope.resolve_by_name(name)?;
    info!(instance = name, scope = %scope.id(), "实例已启动");
    Ok(instance)
}

fn configure_scope(scope: &Scope, instance_options: &InstanceOptions) -> InfrastructureResult<()> {
    for (option, value) in &instance_options.options {
        scope.define_value(option.as_str(), value.clone())?;
    }
    for (binding, target) in &instance_options.bindings {
        scope.define_alias(binding.as_str(), target.as_str())?;
    }
    Ok(())
}

/// 基础设施启动器
///
/// 组合组件目录、启动配置与可选的日志配置
#[derive(Debug, Clone)]
pub struct InfrastructureBootstrapper {
    catalog: ComponentCatalog,
    options: StartOptions,
    environment: Environment,
    logging: Option<LoggingConfig>,
}

impl InfrastructureBootstrapper {
    /// 创建新的基础设施启动器
    pub fn new(catalog: ComponentCatalog) -> Self {
        Self {
            catalog,
            options: StartOptions::default(),
            environment: Environment::new(),
            logging: None,
        }
    }

    /// 设置启动配置
    pub fn with_options(mut self, options: StartOptions) -> Self {
        self.options = options;
        self
    }

    /// 从文件加载启动配置
    pub fn with_options_file(mut self, path: impl AsRef<Path>) -> InfrastructureResult<Self> {
        self.options = StartOptions::from_path(path)?;
        Ok(self)
    }

    /// 设置宿主环境
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// 配置日志，启动时初始化
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &StartOptions {
        &self.options
    }

    /// 启动所有实例
    pub fn bootstrap(&self) -> InfrastructureResult<Vec<(String, Instance)>> {
        if let Some(config) = &self.logging {
            init_logging(config)?;
        }
        info!(
            components = self.catalog.len(),
            instances = self.options.len(),
            "开始启动基础设施"
        );
        let instances = start_with_environment(&self.catalog, &self.options, &self.environment)?;
        info!("基础设施启动完成");
        Ok(instances)
    }
}
