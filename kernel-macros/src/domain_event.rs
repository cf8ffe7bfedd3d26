use crate::derive_utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Expr, Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[domain_event] 宏实现
/// - 仅作用于枚举；变体可为具名、元组或单元形式
/// - 合并/追加派生：Debug, Clone, PartialEq, Serialize, Deserialize
/// - 事件类型默认 `Enum.Variant`，载荷版本默认取枚举级 `version`（缺省 1）
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EventAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let enum_item = match &mut input {
        Item::Enum(e) => e,
        other => {
            return syn::Error::new(other.span(), "#[domain_event] can only be used on enum types")
                .to_compile_error()
                .into();
        }
    };

    apply_derives(
        &mut enum_item.attrs,
        vec![
            syn::parse_quote!(Debug),
            syn::parse_quote!(Clone),
            syn::parse_quote!(PartialEq),
            syn::parse_quote!(serde::Serialize),
            syn::parse_quote!(serde::Deserialize),
        ],
    );

    let default_version = cfg
        .version
        .unwrap_or_else(|| syn::LitInt::new("1", proc_macro2::Span::call_site()));
    let enum_name = enum_item.ident.to_string();

    let mut type_arms = Vec::new();
    let mut version_arms = Vec::new();

    for variant in &mut enum_item.variants {
        let mut overrides = VariantOverrides::default();
        let mut retained = Vec::new();
        for attr in variant.attrs.drain(..) {
            if attr.path().is_ident("event") {
                if let Err(err) = overrides.merge(&attr) {
                    return err.to_compile_error().into();
                }
            } else {
                retained.push(attr);
            }
        }
        variant.attrs = retained;

        let v_ident = &variant.ident;
        let pattern = match &variant.fields {
            syn::Fields::Named(_) => quote! { Self::#v_ident { .. } },
            syn::Fields::Unnamed(_) => quote! { Self::#v_ident(..) },
            syn::Fields::Unit => quote! { Self::#v_ident },
        };

        let event_type = overrides.event_type.unwrap_or_else(|| {
            syn::LitStr::new(&format!("{enum_name}.{v_ident}"), v_ident.span())
        });
        let event_version = overrides
            .event_version
            .unwrap_or_else(|| default_version.clone());

        type_arms.push(quote! { #pattern => #event_type });
        version_arms.push(quote! { #pattern => #event_version });
    }

    let enum_ident = enum_item.ident.clone();
    let generics = enum_item.generics.clone();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // 空枚举没有可匹配的变体
    let (type_body, version_body) = if type_arms.is_empty() {
        (quote! { match *self {} }, quote! { match *self {} })
    } else {
        (
            quote! { match self { #( #type_arms, )* } },
            quote! { match self { #( #version_arms, )* } },
        )
    };

    TokenStream::from(quote! {
        #input

        impl #impl_generics ::kernel_domain::domain_event::DomainEvent for #enum_ident #ty_generics #where_clause {
            fn event_type(&self) -> &str {
                #type_body
            }

            fn event_version(&self) -> usize {
                #version_body
            }
        }
    })
}

#[derive(Default)]
struct VariantOverrides {
    event_type: Option<syn::LitStr>,
    event_version: Option<syn::LitInt>,
}

impl VariantOverrides {
    fn merge(&mut self, attr: &syn::Attribute) -> Result<()> {
        let pairs = attr
            .parse_args_with(Punctuated::<syn::MetaNameValue, Token![,]>::parse_terminated)?;
        for kv in pairs {
            let key = kv
                .path
                .get_ident()
                .map(|i| i.to_string())
                .unwrap_or_default();
            match (key.as_str(), &kv.value) {
                (
                    "event_type",
                    Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(lit),
                        ..
                    }),
                ) => {
                    if self.event_type.replace(lit.clone()).is_some() {
                        return Err(syn::Error::new(
                            kv.path.span(),
                            "duplicate 'event_type' specified for this variant",
                        ));
                    }
                }
                (
                    "event_version",
                    Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Int(lit),
                        ..
                    }),
                ) => {
                    if self.event_version.replace(lit.clone()).is_some() {
                        return Err(syn::Error::new(
                            kv.path.span(),
                            "duplicate 'event_version' specified for this variant",
                        ));
                    }
                }
                ("event_type", other) => {
                    return Err(syn::Error::new(
                        other.span(),
                        "expected string literal for 'event_type'",
                    ));
                }
                ("event_version", other) => {
                    return Err(syn::Error::new(
                        other.span(),
                        "expected integer literal for 'event_version'",
                    ));
                }
                _ => {
                    return Err(syn::Error::new(
                        kv.path.span(),
                        "unknown key; expected 'event_type' | 'event_version'",
                    ));
                }
            }
        }
        Ok(())
    }
}

// 解析枚举级参数：version = <int>
struct EventAttrConfig {
    version: Option<syn::LitInt>,
}

impl Parse for EventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut version: Option<syn::LitInt> = None;
        if input.is_empty() {
            return Ok(Self { version });
        }

        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::parse_terminated(input)?;
        for kv in pairs {
            if !kv.path.is_ident("version") {
                return Err(syn::Error::new(kv.path.span(), "unknown key; expected 'version'"));
            }
            let lit = match &kv.value {
                Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Int(lit),
                    ..
                }) => lit.clone(),
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "expected integer literal for 'version'",
                    ));
                }
            };
            if version.replace(lit).is_some() {
                return Err(syn::Error::new(kv.path.span(), "duplicate key 'version' in attribute"));
            }
        }
        Ok(Self { version })
    }
}
