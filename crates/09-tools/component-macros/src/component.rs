//! `#[derive(Injectable)]` 实现

use crate::inject::FieldSource;
use crate::utils::{component_name, find_attribute};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, LitStr, Result};

/// 组件参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentArgs {
    /// 自定义组件名称
    pub name: Option<String>,
}

impl ComponentArgs {
    /// 从 `#[component(...)]` 属性解析
    pub fn from_input(input: &DeriveInput) -> Result<Self> {
        let mut args = Self::default();
        if let Some(attr) = find_attribute(&input.attrs, "component")? {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    args.name = Some(component_name(&lit)?);
                    Ok(())
                } else {
                    Err(meta.error("未知的组件参数，仅支持 name = \"...\""))
                }
            })?;
        }
        Ok(args)
    }
}

/// 生成 `Injectable` 实现
pub fn derive_injectable_impl(input: &DeriveInput) -> Result<TokenStream> {
    let args = ComponentArgs::from_input(input)?;
    let struct_name = &input.ident;
    let final_name = args.name.unwrap_or_else(|| struct_name.to_string());

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            struct_name,
            "#[derive(Injectable)] 只能用于结构体",
        ));
    };

    let sources = data
        .fields
        .iter()
        .map(FieldSource::from_field)
        .collect::<Result<Vec<_>>>()?;
    let dependencies = sources.iter().map(FieldSource::dependency);
    let values = sources
        .iter()
        .enumerate()
        .map(|(index, source)| source.value(index));

    let construct = match &data.fields {
        Fields::Named(named) => {
            let idents = named.named.iter().map(|field| &field.ident);
            quote! { Self { #(#idents: #values),* } }
        }
        Fields::Unnamed(_) => quote! { Self(#(#values),*) },
        Fields::Unit => quote! { Self },
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::di_abstractions::Injectable for #struct_name #ty_generics #where_clause {
            fn component_name() -> &'static str {
                #final_name
            }

            fn dependencies() -> ::std::vec::Vec<::di_abstractions::Dependency> {
                ::std::vec![#(#dependencies),*]
            }

            #[allow(unused_variables)]
            fn construct(
                arguments: &::di_abstractions::Arguments,
            ) -> ::infrastructure_common::DependencyResult<Self> {
                ::core::result::Result::Ok(#construct)
            }
        }
    })
}
