use quote::ToTokens;
use syn::{Attribute, Token, punctuated::Punctuated};

// 拆分属性：非 derive 属性原样保留，derive 列表展开
pub(crate) fn split_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("derive") {
            retained.push(attr.clone());
            continue;
        }
        if let Ok(list) =
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
        {
            existing.extend(list);
        }
    }
    (retained, existing)
}

// required 在前、用户声明在后，按归一化 key 去重
pub(crate) fn merge_derives(existing: Vec<syn::Path>, required: Vec<syn::Path>) -> Attribute {
    let mut seen = std::collections::HashSet::<String>::new();
    let merged: Vec<syn::Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();
    syn::parse_quote!(#[derive(#(#merged),*)])
}

// Serialize/serde::Serialize 视为同一个 derive
pub(crate) fn derive_key(p: &syn::Path) -> String {
    match p.segments.last() {
        Some(last) => {
            let ident = last.ident.to_string();
            match ident.as_str() {
                "Serialize" | "Deserialize" => format!("serde::{ident}"),
                _ => ident,
            }
        }
        None => p.to_token_stream().to_string(),
    }
}

pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let (retained, existing) = split_derives(attrs);
    let merged = merge_derives(existing, required);
    *attrs = std::iter::once(merged).chain(retained).collect();
}

/// 检查用户是否派生了被宏接管的 trait（如实体的 PartialEq/Hash）
pub(crate) fn reject_derives(attrs: &[Attribute], forbidden: &[&str], hint: &str) -> syn::Result<()> {
    let (_, existing) = split_derives(attrs);
    for p in existing {
        let key = derive_key(&p);
        if forbidden.contains(&key.as_str()) {
            return Err(syn::Error::new_spanned(
                p,
                format!("derive({key}) conflicts with generated impl: {hint}"),
            ));
        }
    }
    Ok(())
}
