//! 组件实例的类型擦除表示
//!
//! 容器以名称管理组件，实例统一保存为 [`Instance`]，由调用方按需向下转换

use crate::errors::DependencyError;
use std::any::Any;
use std::sync::Arc;

/// 类型擦除后的组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 将任意值包装为组件实例
pub fn into_instance<T>(value: T) -> Instance
where
    T: Any + Send + Sync,
{
    Arc::new(value)
}

/// 将组件实例向下转换为具体类型
///
/// `name` 仅用于错误信息
pub fn downcast_instance<T>(name: &str, instance: Instance) -> Result<Arc<T>, DependencyError>
where
    T: Any + Send + Sync,
{
    instance
        .downcast::<T>()
        .map_err(|_| DependencyError::type_mismatch::<T>(name))
}
