//! 宏工具函数

use syn::{Attribute, Error, LitStr, Result};

/// 查找唯一的同名属性，重复出现时报错
pub fn find_attribute<'a>(attrs: &'a [Attribute], attr_name: &str) -> Result<Option<&'a Attribute>> {
    let mut found = attrs.iter().filter(|attr| attr.path().is_ident(attr_name));
    let first = found.next();
    if let Some(duplicate) = found.next() {
        return Err(Error::new_spanned(
            duplicate,
            format!("属性 #[{attr_name}] 只能出现一次"),
        ));
    }
    Ok(first)
}

/// 读取非空的组件名称
pub fn component_name(lit: &LitStr) -> Result<String> {
    let value = lit.value();
    if value.trim().is_empty() {
        return Err(Error::new_spanned(lit, "组件名称不能为空"));
    }
    Ok(value)
}
