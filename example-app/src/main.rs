//! # 示例应用程序
//!
//! 演示如何使用组件目录、启动配置与作用域派生

mod components;

use anyhow::Context;
use clap::Parser;
use components::{as_controller, catalog, AboutController, Controller};
use infrastructure_common::{BoxError, Environment};
use infrastructure_composition::{ComponentCatalog, InfrastructureBootstrapper, LoggingConfig};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn ADSP 组件注入示例应用")]
struct Args {
    /// 启动配置文件路径，支持 .toml 与 .json
    #[arg(short, long, default_value = "config/start.toml")]
    config: PathBuf,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 是否输出 JSON 格式日志
    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = LoggingConfig::default()
        .with_level_name(&args.log_level)?
        .with_json_format(args.json_logs);

    let bootstrapper = InfrastructureBootstrapper::new(catalog())
        .with_options_file(&args.config)
        .with_context(|| format!("无法加载启动配置: {}", args.config.display()))?
        .with_logging(logging);

    // 日志订阅器在 bootstrap 中安装，之前的日志不会输出
    let instances = bootstrapper.bootstrap()?;
    info!(instances = instances.len(), "Lorn ADSP 示例应用已启动");

    for (name, instance) in &instances {
        match as_controller(instance) {
            Some(controller) => info!(instance = %name, "{}", controller.describe()),
            None => warn!(instance = %name, "实例不是控制器"),
        }
    }

    demonstrate_bindings(bootstrapper.catalog())?;

    info!("应用已结束");
    Ok(())
}

/// 演示环境绑定与派生作用域
fn demonstrate_bindings(catalog: &ComponentCatalog) -> anyhow::Result<()> {
    let scope = catalog.scope(Environment::new().with("region", String::from("cn-east")))?;
    scope
        .define_value(
            "AboutControllerOptions",
            json!({ "title": "关于", "path": "/about" }),
        )?
        .bind(
            "AboutController",
            |environment: &Environment, controller: Arc<AboutController>| {
                environment.insert(format!("route:{}", controller.path()), controller.title().to_string());
                Ok::<(), BoxError>(())
            },
        );

    scope.resolve::<AboutController>("AboutController")?;
    let child = scope.fork(Environment::new().with("region", String::from("us-west")));
    child.resolve::<AboutController>("AboutController")?;

    let region = child
        .environment()
        .get::<String>("region")?
        .context("派生作用域缺少 region")?;
    info!(
        parent = ?scope.environment().keys(),
        child = ?child.environment().keys(),
        region = %region,
        "环境绑定完成"
    );
    Ok(())
}
