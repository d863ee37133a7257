//! `Shape` generation.
//!
//! Emits the body of `Introspect::shape`, a `OnceLock`-cached description of
//! the record fields or union variants.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use super::format::{ParseError, TemplateKind, generate_segments, parse_template};
use crate::attrs::{FieldAttrs, IntrospectAttrs, VariantAttrs};

/// Generate the `shape()` method.
pub fn generate_shape(attrs: &IntrospectAttrs, root: &syn::Path) -> syn::Result<TokenStream> {
    let type_name = attrs.type_name();

    let mut build = if attrs.is_union() {
        let variants = attrs
            .variants()
            .map(|variant| generate_variant_desc(variant, root))
            .collect::<syn::Result<Vec<_>>>()?;
        quote! { #root::Shape::union(#type_name, vec![#(#variants),*]) }
    } else {
        let fields = generate_field_set(attrs.fields(), root)?;
        quote! { #root::Shape::record(#type_name, #fields) }
    };
    if let Some(template) = &attrs.format {
        let segments = generate_template(template, TemplateKind::Container, root)
            .map_err(|err| syn::Error::new_spanned(&attrs.ident, format!("`{type_name}`: {err}")))?;
        build.extend(quote! { .with_format(#segments) });
    }

    Ok(quote! {
        fn shape(&self) -> &'static #root::Shape {
            static SHAPE: ::std::sync::OnceLock<#root::Shape> = ::std::sync::OnceLock::new();
            SHAPE.get_or_init(|| #build)
        }
    })
}

fn generate_field_set<'a>(
    fields: impl Iterator<Item = &'a FieldAttrs>,
    root: &syn::Path,
) -> syn::Result<TokenStream> {
    let descs = fields
        .enumerate()
        .map(|(index, field)| generate_field_desc(field, index, root))
        .collect::<syn::Result<Vec<_>>>()?;
    Ok(quote! { #root::FieldSet::new(vec![#(#descs),*]) })
}

fn generate_field_desc(field: &FieldAttrs, index: usize, root: &syn::Path) -> syn::Result<TokenStream> {
    let name = field.name(index);
    let type_name = type_text(&field.ty);

    let mut desc = quote! { #root::FieldDesc::new(#name, #type_name) };
    if field.skip {
        desc.extend(quote! { .hidden() });
    }
    if field.skip_str {
        desc.extend(quote! { .skip_str() });
    }
    if field.skip_repr {
        desc.extend(quote! { .skip_repr() });
    }
    if field.default.is_some() || field.skip {
        desc.extend(quote! { .with_default() });
    }
    if let Some(template) = &field.format {
        let segments = generate_template(template, TemplateKind::Field, root)
            .map_err(|err| syn::Error::new_spanned(&field.ty, format!("field `{name}`: {err}")))?;
        desc.extend(quote! { .with_format(#segments) });
    }

    Ok(desc)
}

fn generate_variant_desc(variant: &VariantAttrs, root: &syn::Path) -> syn::Result<TokenStream> {
    let name = variant.name();

    let mut desc = if variant.is_unit() {
        quote! { #root::VariantDesc::unit(#name) }
    } else {
        let fields = generate_field_set(variant.fields.iter(), root)?;
        quote! { #root::VariantDesc::new(#name, #fields) }
    };
    if variant.skip {
        desc.extend(quote! { .hidden() });
    }
    if variant.skip_str {
        desc.extend(quote! { .skip_str() });
    }
    if variant.skip_repr {
        desc.extend(quote! { .skip_repr() });
    }
    if let Some(template) = &variant.format {
        let segments = generate_template(template, TemplateKind::Variant, root)
            .map_err(|err| syn::Error::new_spanned(&variant.ident, format!("variant `{name}`: {err}")))?;
        desc.extend(quote! { .with_format(#segments) });
    }

    Ok(desc)
}

fn generate_template(
    template: &str,
    kind: TemplateKind,
    root: &syn::Path,
) -> Result<TokenStream, ParseError> {
    Ok(generate_segments(&parse_template(template, kind)?, root))
}

/// Source text of a type with token spacing collapsed, e.g. `Option<City>`.
pub fn type_text(ty: &syn::Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let chars: Vec<char> = raw.chars().collect();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut out = String::with_capacity(raw.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let before = i.checked_sub(1).map(|j| chars[j]);
            let after = chars.get(i + 1).copied();
            match (before, after) {
                (Some(b), Some(a)) if is_word(b) && is_word(a) => out.push(' '),
                (_, Some('+')) | (Some('+'), _) => out.push(' '),
                _ => {}
            }
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_type_text() {
        let ty: syn::Type = parse_quote!(Option<City>);
        assert_eq!(type_text(&ty), "Option<City>");

        let ty: syn::Type = parse_quote!(std::collections::HashMap<String, Vec<u32>>);
        assert_eq!(type_text(&ty), "std::collections::HashMap<String,Vec<u32>>");

        let ty: syn::Type = parse_quote!(Box<dyn Render + Send>);
        assert_eq!(type_text(&ty), "Box<dyn Render + Send>");
    }

    #[test]
    fn test_invalid_format_is_compile_error() {
        let input: syn::DeriveInput = parse_quote! {
            pub struct Tagged {
                #[introspect(format = "A[{")]
                pub value: u32,
            }
        };
        let attrs = <IntrospectAttrs as darling::FromDeriveInput>::from_derive_input(&input).unwrap();
        let root: syn::Path = parse_quote!(::reprkit);
        let err = generate_shape(&attrs, &root).unwrap_err();
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn test_container_format_takes_two_arguments() {
        let input: syn::DeriveInput = parse_quote! {
            #[introspect(format = "{}.{}.{}")]
            pub enum Mode {
                Open,
            }
        };
        let attrs = <IntrospectAttrs as darling::FromDeriveInput>::from_derive_input(&input).unwrap();
        let root: syn::Path = parse_quote!(::reprkit);
        let err = generate_shape(&attrs, &root).unwrap_err();
        assert!(err.to_string().contains("`Mode`"));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_tuple_fields_use_positional_names() {
        let input: syn::DeriveInput = parse_quote! {
            pub struct Reading(u32, f32);
        };
        let attrs = <IntrospectAttrs as darling::FromDeriveInput>::from_derive_input(&input).unwrap();
        let root: syn::Path = parse_quote!(::reprkit);
        let tokens = generate_shape(&attrs, &root).unwrap().to_string();
        assert!(tokens.contains(r#""0""#));
        assert!(tokens.contains(r#""1""#));
        assert!(!tokens.contains("with_format"));
    }
}
