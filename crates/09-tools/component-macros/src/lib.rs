//! # Component Macros
//!
//! 这个 crate 提供了把结构体声明转换为组件定义的过程宏。
//!
//! 每个字段按声明顺序对应一个构造位置：
//!
//! - `#[inject("Name")]` - 注入名为 `Name` 的组件
//! - `#[inject(config = "Name")]` - 把名为 `Name` 的 JSON 值反序列化为字段类型
//! - `#[inject(gap)]` - 空位，按 `FromArgument` 提取，`Option<Arc<T>>` 字段得到 `None`
//! - 未标注的字段是空位，使用 `Default::default()`
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::Injectable;
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! #[component(name = "HomeController")]
//! pub struct HomeController {
//!     #[inject("IDatabase")]
//!     database: Arc<MongoDatabase>,
//!     #[inject(config = "HomeControllerOptions")]
//!     options: HomeControllerOptions,
//!     requests: u64,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod component;
mod inject;
mod utils;

/// 可注入组件派生宏
///
/// 生成 `di_abstractions::Injectable` 实现，组件名称默认为结构体名称。
/// 使用方需要依赖 `di-abstractions` 与 `infrastructure-common`。
#[proc_macro_derive(Injectable, attributes(component, inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_injectable_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
