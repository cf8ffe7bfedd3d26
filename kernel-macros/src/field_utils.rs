use syn::{Field, FieldsNamed, Token, Type, punctuated::Punctuated};

fn find_field<'a>(named: &'a Punctuated<Field, Token![,]>, name: &str) -> Option<&'a Field> {
    named
        .iter()
        .find(|f| f.ident.as_ref().is_some_and(|i| i == name))
}

/// 将所需字段按给定顺序放到最前：
/// - 已存在的字段复用原定义（保留用户的属性与可见性）
/// - 缺失的字段以私有字段形式补齐
/// - 其余字段保持原有相对顺序
pub(crate) fn ensure_leading_fields(
    fields_named: &mut FieldsNamed,
    required: &[(&str, Type)],
) -> syn::Result<()> {
    let old_named = fields_named.named.clone();
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    for (name, ty) in required {
        match find_field(&old_named, name) {
            Some(existing) => new_named.push(existing.clone()),
            None => {
                let ident: syn::Ident = syn::parse_str(name)?;
                new_named.push(syn::parse_quote! { #ident: #ty });
            }
        }
    }

    for f in old_named {
        let is_required = f
            .ident
            .as_ref()
            .is_some_and(|i| required.iter().any(|(n, _)| i == n));
        if !is_required {
            new_named.push(f);
        }
    }

    fields_named.named = new_named;
    Ok(())
}
