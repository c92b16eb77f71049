//! 示例组件

use component_macros::Injectable;
use infrastructure_common::Instance;
use infrastructure_composition::ComponentCatalog;
use serde::Deserialize;
use std::sync::Arc;

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct MongoOptions {
    pub url: String,
}

/// 控制器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerOptions {
    pub title: String,
    pub path: String,
}

/// 数据库组件
#[derive(Debug, Injectable)]
pub struct MongoDatabase {
    #[inject(config = "MongoOptions")]
    options: MongoOptions,
}

impl MongoDatabase {
    pub fn url(&self) -> &str {
        &self.options.url
    }

    /// 连接串最后一段作为库名
    pub fn database_name(&self) -> &str {
        self.options.url.rsplit('/').next().unwrap_or_default()
    }
}

pub trait Controller {
    fn path(&self) -> &str;

    fn describe(&self) -> String;
}

/// 首页控制器
#[derive(Debug, Injectable)]
pub struct HomeController {
    #[inject("IDatabase")]
    database: Arc<MongoDatabase>,
    #[inject(config = "HomeControllerOptions")]
    options: ControllerOptions,
}

impl Controller for HomeController {
    fn path(&self) -> &str {
        &self.options.path
    }

    fn describe(&self) -> String {
        format!(
            "{} ({}) -> 数据库 {}",
            self.options.title,
            self.options.path,
            self.database.database_name()
        )
    }
}

/// 关于页控制器
#[derive(Debug, Injectable)]
pub struct AboutController {
    #[inject(config = "AboutControllerOptions")]
    options: ControllerOptions,
    visits: u64,
}

impl AboutController {
    pub fn title(&self) -> &str {
        &self.options.title
    }
}

impl Controller for AboutController {
    fn path(&self) -> &str {
        &self.options.path
    }

    fn describe(&self) -> String {
        format!("{} ({}) 访问 {} 次", self.options.title, self.options.path, self.visits)
    }
}

/// 以控制器视角查看实例
pub fn as_controller(instance: &Instance) -> Option<&dyn Controller> {
    if let Some(controller) = instance.downcast_ref::<HomeController>() {
        return Some(controller as &dyn Controller);
    }
    instance
        .downcast_ref::<AboutController>()
        .map(|controller| controller as &dyn Controller)
}

/// 应用的组件目录
pub fn catalog() -> ComponentCatalog {
    let mut catalog = ComponentCatalog::new();
    catalog
        .register::<MongoDatabase>()
        .register::<HomeController>()
        .register::<AboutController>()
        .assert("MongoDatabase", |database: &MongoDatabase| {
            if database.url().starts_with("mongodb://") {
                Ok(())
            } else {
                Err(format!("无效的数据库地址: {}", database.url()))
            }
        })
        .assert("HomeController", |controller: &HomeController| {
            if controller.path().starts_with('/') {
                Ok(())
            } else {
                Err(format!("路由必须以 / 开头: {}", controller.path()))
            }
        });
    catalog
}
