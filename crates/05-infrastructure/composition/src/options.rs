//! 启动配置
//!
//! 实例名称到 [`InstanceOptions`] 的有序映射，支持 JSON 与 TOML

use infrastructure_common::{ConfigError, ConfigResult};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// 单个实例的启动选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstanceOptions {
    /// 本地名称到已有组件名称的别名
    pub bindings: BTreeMap<String, String>,
    /// 选项名称到字面值，注册为无依赖组件
    pub options: BTreeMap<String, Value>,
}

impl InstanceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), target.into());
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: Value) -> Self {
        self.options.insert(name.into(), value);
        self
    }
}

/// 启动配置
///
/// 保持实例在配置中出现的顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartOptions {
    entries: Vec<(String, InstanceOptions)>,
}

impl StartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加实例，同名实例会被替换并保持原位置
    pub fn with_instance(mut self, name: impl Into<String>, options: InstanceOptions) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = options,
            None => self.entries.push((name, options)),
        }
        self
    }

    /// 从 JSON 文本解析
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(ConfigError::parse_error)
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(ConfigError::parse_error)
    }

    /// 按扩展名从文件加载
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> ConfigResult<Self> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("toml") => Self::from_toml_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.display().to_string(),
                })
            }
        };

        info!("加载启动配置: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let options = parse(&content)?;
        debug!(instances = options.len(), "启动配置解析完成");
        Ok(options)
    }

    pub fn get(&self, name: &str) -> Option<&InstanceOptions> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, options)| options)
    }

    /// 按配置顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstanceOptions)> {
        self.entries
            .iter()
            .map(|(name, options)| (name.as_str(), options))
    }

    pub fn instance_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for StartOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, options) in &self.entries {
            map.serialize_entry(name, options)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StartOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StartOptionsVisitor)
    }
}

struct StartOptionsVisitor;

impl<'de> Visitor<'de> for StartOptionsVisitor {
    type Value = StartOptions;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("实例名称到启动选项的映射")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        let mut seen = HashSet::new();
        while let Some((name, options)) = access.next_entry::<String, InstanceOptions>()? {
            if !seen.insert(name.clone()) {
                return Err(de::Error::custom(format!("重复的实例名称: {name}")));
            }
            entries.push((name, options));
        }
        Ok(StartOptions { entries })
    }
}
