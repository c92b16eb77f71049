//! 字段注入参数解析

use crate::utils::{component_name, find_attribute};
use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::ParseStream;
use syn::{Error, Field, Ident, LitStr, Result, Token};

/// 字段的取值来源
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    /// `#[inject("Name")]`，按组件注入
    Component(String),
    /// `#[inject(config = "Name")]`，从 JSON 值反序列化
    Config(String),
    /// `#[inject(gap)]`，空位按 `FromArgument` 提取，`Option<Arc<T>>` 得到 `None`
    Gap,
    /// 未标注的空位，使用 `Default::default()`
    Default,
}

impl FieldSource {
    /// 从字段属性解析
    pub fn from_field(field: &Field) -> Result<Self> {
        match find_attribute(&field.attrs, "inject")? {
            Some(attr) => attr.parse_args_with(Self::parse_inject),
            None => Ok(Self::Default),
        }
    }

    fn parse_inject(input: ParseStream<'_>) -> Result<Self> {
        if input.peek(LitStr) {
            let name: LitStr = input.parse()?;
            return Ok(Self::Component(component_name(&name)?));
        }

        let key: Ident = input.parse()?;
        if key == "gap" {
            return Ok(Self::Gap);
        }
        if key != "config" {
            return Err(Error::new_spanned(
                &key,
                "未知的注入参数，应为 #[inject(\"Name\")]、#[inject(config = \"Name\")] 或 #[inject(gap)]",
            ));
        }
        input.parse::<Token![=]>()?;
        let name: LitStr = input.parse()?;
        Ok(Self::Config(component_name(&name)?))
    }

    /// 依赖列表中的对应位置
    pub fn dependency(&self) -> TokenStream {
        match self {
            Self::Component(name) | Self::Config(name) => {
                quote! { ::di_abstractions::Dependency::named(#name) }
            }
            Self::Gap | Self::Default => quote! { ::di_abstractions::Dependency::gap() },
        }
    }

    /// 构造字段值的表达式
    pub fn value(&self, index: usize) -> TokenStream {
        match self {
            Self::Component(_) | Self::Gap => quote! { arguments.extract(#index)? },
            Self::Config(_) => quote! { arguments.deserialize(#index)? },
            Self::Default => quote! { ::core::default::Default::default() },
        }
    }
}
