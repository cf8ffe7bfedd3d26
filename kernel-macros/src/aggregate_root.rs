use crate::entity::{identity_impls, parse_bool, prepare_struct};
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[aggregate_root] 宏实现
/// - 在 `#[entity]` 的基础上追加 `ledger: EventLedger<Event>`（位于 `id` 之后）
/// - 实现 `::kernel_domain::aggregate::HasLedger`
/// - 具体的 `AggregateRoot`（TYPE/apply/invariants）仍由使用者实现
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as AggregateRootAttrConfig);
    let input = parse_macro_input!(item as Item);

    let Some(event_ty) = cfg.event_ty else {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[aggregate_root] requires `event = EventType`",
        )
        .to_compile_error()
        .into();
    };

    let ledger_ty: Type = syn::parse_quote! { ::kernel_domain::aggregate::EventLedger<#event_ty> };
    let st = match prepare_struct(
        input,
        cfg.derive_debug.unwrap_or(true),
        vec![("ledger", ledger_ty)],
    ) {
        Ok(st) => st,
        Err(err) => return err.to_compile_error().into(),
    };

    let identity_impls = identity_impls(&st);
    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    TokenStream::from(quote! {
        #st
        #identity_impls

        impl #impl_generics ::kernel_domain::aggregate::HasLedger for #ident #ty_generics #where_clause {
            type Event = #event_ty;

            fn ledger(&self) -> &::kernel_domain::aggregate::EventLedger<Self::Event> {
                &self.ledger
            }

            fn ledger_mut(&mut self) -> &mut ::kernel_domain::aggregate::EventLedger<Self::Event> {
                &mut self.ledger
            }
        }
    })
}

// -------- parsing --------

struct AggregateRootAttrConfig {
    event_ty: Option<Type>,
    derive_debug: Option<bool>,
}

impl Parse for AggregateRootAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self {
            event_ty: None,
            derive_debug: None,
        };
        if input.is_empty() {
            return Ok(cfg);
        }

        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::parse_terminated(input)?;
        for kv in pairs {
            let key = kv
                .path
                .get_ident()
                .map(|i| i.to_string())
                .unwrap_or_default();
            match key.as_str() {
                "event" => {
                    let ty: Type = syn::parse2(kv.value.to_token_stream())?;
                    if cfg.event_ty.replace(ty).is_some() {
                        return Err(syn::Error::new(
                            kv.path.span(),
                            "duplicate key 'event' in attribute",
                        ));
                    }
                }
                "debug" => {
                    let value = parse_bool(&kv.value)?;
                    if cfg.derive_debug.replace(value).is_some() {
                        return Err(syn::Error::new(
                            kv.path.span(),
                            "duplicate key 'debug' in attribute",
                        ));
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        kv.path.span(),
                        "unknown key in attribute; expected 'event' | 'debug'",
                    ));
                }
            }
        }
        Ok(cfg)
    }
}
