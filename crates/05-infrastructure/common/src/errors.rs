//! 错误类型定义

use thiserror::Error;

/// 组件钩子与工厂返回的装箱错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("不支持的配置格式: {path}")]
    UnsupportedFormat { path: String },
}

impl ConfigError {
    /// 创建解析错误
    pub fn parse_error(source: impl Into<BoxError>) -> Self {
        Self::ParseError {
            source: source.into(),
        }
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件已注册: '{name}'")]
    DuplicateRegistration { name: String },

    #[error("组件不存在: '{name}'")]
    UnknownComponent { name: String },

    #[error("组件 '{owner}' 的依赖 '{dependency}' 不存在")]
    UnknownDependency { owner: String, dependency: String },

    #[error("检测到循环依赖: {chain}")]
    CyclicDependency { chain: String },

    #[error("解析组件 '{name}' 超出最大深度 {max_depth}")]
    ResolutionDepthExceeded { name: String, max_depth: usize },

    #[error("组件创建失败: '{name}', 原因: {source}")]
    ComponentCreationFailed { name: String, source: BoxError },

    #[error("组件 '{name}' 断言失败: {source}")]
    AssertionFailure { name: String, source: BoxError },

    #[error("组件 '{name}' 环境绑定失败: {source}")]
    BindingFailure { name: String, source: BoxError },

    #[error("组件 '{name}' 类型不匹配, 期望 {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("组件 '{owner}' 的第 {index} 个参数缺失")]
    MissingArgument { owner: String, index: usize },

    #[error("组件 '{owner}' 的第 {index} 个参数反序列化失败: {source}")]
    ArgumentDeserialization {
        owner: String,
        index: usize,
        source: serde_json::Error,
    },
}

impl DependencyError {
    /// 返回错误所指向的组件名称
    pub fn component(&self) -> &str {
        match self {
            Self::DuplicateRegistration { name }
            | Self::UnknownComponent { name }
            | Self::ResolutionDepthExceeded { name, .. }
            | Self::ComponentCreationFailed { name, .. }
            | Self::AssertionFailure { name, .. }
            | Self::BindingFailure { name, .. }
            | Self::TypeMismatch { name, .. } => name,
            Self::UnknownDependency { owner, .. }
            | Self::MissingArgument { owner, .. }
            | Self::ArgumentDeserialization { owner, .. } => owner,
            Self::CyclicDependency { chain } => chain.split(" -> ").next().unwrap_or(chain),
        }
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch<T: ?Sized>(name: impl Into<String>) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected: std::any::type_name::<T>(),
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
