use crate::derive_utils::{apply_derives, reject_derives};
use crate::field_utils::ensure_leading_fields;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, ItemStruct, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[entity] 宏实现
/// - 若缺失则追加 `id: Identity<Self>` 并置于字段最前
/// - 实现 `::kernel_domain::entity::Entity`，相等与哈希仅依据标识
/// - 支持参数：`#[entity(debug = true|false)]`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    match prepare_struct(input, cfg.derive_debug.unwrap_or(true), Vec::new()) {
        Ok(st) => {
            let identity_impls = identity_impls(&st);
            TokenStream::from(quote! {
                #st
                #identity_impls
            })
        }
        Err(err) => err.to_compile_error().into(),
    }
}

/// 规范化实体结构体：校验形状、补齐 `id` 与额外字段、合并派生
pub(crate) fn prepare_struct(
    input: Item,
    derive_debug: bool,
    extra_fields: Vec<(&str, Type)>,
) -> Result<ItemStruct> {
    let mut st = match input {
        Item::Struct(s) => s,
        other => return Err(syn::Error::new(other.span(), "expected a struct")),
    };

    reject_derives(
        &st.attrs,
        &["PartialEq", "Eq", "Hash", "Default"],
        "entity equality and hashing are defined by identity",
    )?;

    let ident = st.ident.clone();
    let (_, ty_generics, _) = st.generics.split_for_impl();
    let id_ty: Type = syn::parse_quote! { ::kernel_domain::identity::Identity<#ident #ty_generics> };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => return Err(syn::Error::new(st.span(), "only supports named-field struct")),
    };

    let mut required = vec![("id", id_ty)];
    required.extend(extra_fields);
    ensure_leading_fields(fields_named, &required)?;

    let mut derives: Vec<syn::Path> = vec![syn::parse_quote!(Clone)];
    if derive_debug {
        derives.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, derives);

    Ok(st)
}

/// 生成 `Entity` 与基于标识的 `PartialEq`/`Eq`/`Hash` 实现
pub(crate) fn identity_impls(st: &ItemStruct) -> proc_macro2::TokenStream {
    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    quote! {
        impl #impl_generics ::kernel_domain::entity::Entity for #ident #ty_generics #where_clause {
            fn id(&self) -> &::kernel_domain::identity::Identity<Self> {
                &self.id
            }
        }

        impl #impl_generics ::core::cmp::PartialEq for #ident #ty_generics #where_clause {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl #impl_generics ::core::cmp::Eq for #ident #ty_generics #where_clause {}

        impl #impl_generics ::core::hash::Hash for #ident #ty_generics #where_clause {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash(&self.id, state);
            }
        }
    }
}

// -------- parsing --------

struct EntityAttrConfig {
    derive_debug: Option<bool>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut derive_debug: Option<bool> = None;
        if input.is_empty() {
            return Ok(Self { derive_debug });
        }

        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::parse_terminated(input)?;
        for kv in pairs {
            if !kv.path.is_ident("debug") {
                return Err(syn::Error::new(
                    kv.path.span(),
                    "unknown key in attribute; expected 'debug'",
                ));
            }
            let value = parse_bool(&kv.value)?;
            if derive_debug.replace(value).is_some() {
                return Err(syn::Error::new(kv.path.span(), "duplicate key 'debug' in attribute"));
            }
        }
        Ok(Self { derive_debug })
    }
}

pub(crate) fn parse_bool(expr: &syn::Expr) -> Result<bool> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Bool(b),
            ..
        }) => Ok(b.value()),
        other => Err(syn::Error::new(other.span(), "expected boolean literal")),
    }
}
