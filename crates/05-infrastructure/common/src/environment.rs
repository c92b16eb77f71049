//! 宿主环境
//!
//! 作用域持有的环境对象，环境绑定钩子可以把解析出的实例写入其中

use crate::component::{downcast_instance, into_instance, Instance};
use crate::errors::DependencyError;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 宿主环境
///
/// 以名称为键保存类型擦除的值。通过共享引用即可写入，
/// 因此环境绑定钩子只需要 `&Environment`
#[derive(Default)]
pub struct Environment {
    entries: RwLock<HashMap<String, Instance>>,
}

impl Environment {
    /// 创建空环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个值并返回自身，便于链式构造
    pub fn with<T>(self, key: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.insert(key, value);
        self
    }

    /// 写入一个值，同名键会被覆盖
    pub fn insert<T>(&self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.insert_instance(key, into_instance(value));
    }

    /// 写入一个已擦除类型的实例
    pub fn insert_instance(&self, key: impl Into<String>, instance: Instance) {
        self.entries.write().insert(key.into(), instance);
    }

    /// 读取原始实例
    pub fn get_instance(&self, key: &str) -> Option<Instance> {
        self.entries.read().get(key).cloned()
    }

    /// 读取并向下转换
    pub fn get<T>(&self, key: &str) -> Result<Option<Arc<T>>, DependencyError>
    where
        T: Any + Send + Sync,
    {
        self.get_instance(key)
            .map(|instance| downcast_instance::<T>(key, instance))
            .transpose()
    }

    /// 是否包含指定键
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// 所有键，按字典序
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// 合并出新的环境，`overrides` 中的键优先
    ///
    /// 两个源环境都不会被修改
    pub fn merged(&self, overrides: &Environment) -> Environment {
        let mut entries = self.entries.read().clone();
        entries.extend(
            overrides
                .entries
                .read()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Environment {
            entries: RwLock::new(entries),
        }
    }
}

/// 复制当前条目的快照，之后两者互不影响
impl Clone for Environment {
    fn clone(&self) -> Self {
        Self {
            entries: RwLock::new(self.entries.read().clone()),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let environment = Environment::new().with("port", 8080_u16);

        let port = environment.get::<u16>("port").unwrap().unwrap();
        assert_eq!(*port, 8080);
        assert!(environment.get::<u16>("host").unwrap().is_none());
    }

    #[test]
    fn test_get_with_wrong_type_fails() {
        let environment = Environment::new().with("port", 8080_u16);
        assert!(environment.get::<String>("port").is_err());
    }

    #[test]
    fn test_merged_prefers_overrides_and_leaves_sources_untouched() {
        let parent = Environment::new()
            .with("name", String::from("parent"))
            .with("debug", false);
        let overrides = Environment::new()
            .with("name", String::from("child"))
            .with("region", String::from("eu"));

        let merged = parent.merged(&overrides);

        assert_eq!(merged.keys(), vec!["debug", "name", "region"]);
        assert_eq!(merged.get::<String>("name").unwrap().unwrap().as_str(), "child");
        assert_eq!(parent.get::<String>("name").unwrap().unwrap().as_str(), "parent");
        assert!(!parent.contains("region"));

        merged.insert("late", 1_u8);
        assert!(!parent.contains("late"));
        assert!(!overrides.contains("late"));
    }
}
