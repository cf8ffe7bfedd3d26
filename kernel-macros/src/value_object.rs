use crate::derive_utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：Clone, (Debug 可控), Serialize, PartialEq, Eq, Hash
/// - 不追加 Default：值对象应经由校验工厂构造，确有零值语义时由使用者自行派生
/// - 结构体字段必须私有：外部只能经由校验工厂构造，也无法就地修改
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(Hash),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }

    let (ident, generics) = match &mut input {
        Item::Struct(st) => {
            if let Err(err) = reject_public_fields(&st.fields) {
                return err.to_compile_error().into();
            }
            apply_derives(&mut st.attrs, required);
            (st.ident.clone(), st.generics.clone())
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, required);
            (en.ident.clone(), en.generics.clone())
        }
        other => {
            return syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
                .to_compile_error()
                .into();
        }
    };

    let type_name = cfg
        .name
        .unwrap_or_else(|| syn::LitStr::new(&ident.to_string(), ident.span()));
    let validate_body = match cfg.validate {
        Some(path) => quote! { #path(self) },
        None => quote! { ::core::result::Result::Ok(()) },
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    TokenStream::from(quote! {
        #input

        impl #impl_generics ::kernel_domain::value_object::ValueObject for #ident #ty_generics #where_clause {
            const TYPE: &'static str = #type_name;

            fn validate(&self) -> ::core::result::Result<(), ::kernel_domain::error::ValidationError> {
                #validate_body
            }
        }
    })
}

fn reject_public_fields(fields: &syn::Fields) -> Result<()> {
    for field in fields {
        if !matches!(field.vis, syn::Visibility::Inherited) {
            return Err(syn::Error::new_spanned(
                &field.vis,
                "value object fields must be private; construct through `validated` and change through `with_changes`",
            ));
        }
    }
    Ok(())
}

// -------- parsing --------

struct ValueObjectAttrConfig {
    name: Option<syn::LitStr>,
    validate: Option<syn::Path>,
    derive_debug: Option<bool>,
}

impl Parse for ValueObjectAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self {
            name: None,
            validate: None,
            derive_debug: None,
        };
        if input.is_empty() {
            return Ok(cfg);
        }

        let elems: Punctuated<ValueObjectAttrElem, Token![,]> =
            Punctuated::parse_terminated(input)?;

        for elem in elems {
            match elem {
                ValueObjectAttrElem::Name(key, lit) => {
                    if cfg.name.replace(lit).is_some() {
                        return Err(syn::Error::new(key.span(), "duplicate key 'name' in attribute"));
                    }
                }
                ValueObjectAttrElem::Validate(key, path) => {
                    if cfg.validate.replace(path).is_some() {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate key 'validate' in attribute",
                        ));
                    }
                }
                ValueObjectAttrElem::Debug(key, b) => {
                    if cfg.derive_debug.replace(b).is_some() {
                        return Err(syn::Error::new(key.span(), "duplicate key 'debug' in attribute"));
                    }
                }
            }
        }
        Ok(cfg)
    }
}

enum ValueObjectAttrElem {
    Name(syn::Ident, syn::LitStr),
    Validate(syn::Ident, syn::Path),
    Debug(syn::Ident, bool),
}

impl Parse for ValueObjectAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        if key == "name" {
            Ok(Self::Name(key, input.parse()?))
        } else if key == "validate" {
            Ok(Self::Validate(key, input.parse()?))
        } else if key == "debug" {
            let lit: syn::LitBool = input.parse()?;
            Ok(Self::Debug(key, lit.value()))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'name' | 'validate' | 'debug'",
            ))
        }
    }
}
