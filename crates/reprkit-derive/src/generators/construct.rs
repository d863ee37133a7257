//! Keyword constructor generation.
//!
//! Records get `from_kwargs(&Kwargs)`, unions get
//! `from_variant_kwargs(variant, &Kwargs)`. Unknown or hidden names are
//! rejected before any field is read; fields are then read in declaration
//! order, so the first missing or out-of-range field is the one reported.

use proc_macro2::TokenStream;
use quote::quote;

use crate::attrs::{DefaultValue, FieldAttrs, IntrospectAttrs};

/// Generate the inherent constructor impl.
pub fn generate_constructor(attrs: &IntrospectAttrs, root: &syn::Path) -> syn::Result<TokenStream> {
    let ident = &attrs.ident;
    let vis = &attrs.vis;
    let type_name = attrs.type_name();

    let method = if attrs.is_union() {
        let mut arms = Vec::new();
        for variant in attrs.variants() {
            let variant_ident = &variant.ident;
            let variant_name = variant.name();
            let qualified = format!("{type_name}.{variant_name}");
            let fields: Vec<_> = variant.fields.iter().collect();
            let check = generate_check(&qualified, &fields, root);
            let body = if variant.is_unit() {
                quote! { Self::#variant_ident }
            } else {
                let inits = generate_inits(&qualified, &fields, root)?;
                quote! { Self::#variant_ident { #(#inits),* } }
            };
            arms.push(quote! {
                #variant_name => {
                    #check
                    ::std::result::Result::Ok(#body)
                }
            });
        }

        quote! {
            /// Build the named variant from keyword values.
            #vis fn from_variant_kwargs(
                variant: &str,
                kwargs: &#root::Kwargs,
            ) -> ::std::result::Result<Self, #root::IntrospectError> {
                match variant {
                    #(#arms)*
                    other => ::std::result::Result::Err(
                        #root::IntrospectError::attribute_not_found(#type_name, other),
                    ),
                }
            }
        }
    } else {
        let fields: Vec<_> = attrs.fields().collect();
        let check = generate_check(&type_name, &fields, root);
        let inits = generate_inits(&type_name, &fields, root)?;

        quote! {
            /// Build an instance from keyword values.
            #vis fn from_kwargs(
                kwargs: &#root::Kwargs,
            ) -> ::std::result::Result<Self, #root::IntrospectError> {
                #check
                ::std::result::Result::Ok(Self { #(#inits),* })
            }
        }
    };

    Ok(quote! {
        impl #ident {
            #method
        }
    })
}

fn generate_check(type_name: &str, fields: &[&FieldAttrs], root: &syn::Path) -> TokenStream {
    let accepted = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.skip)
        .map(|(index, f)| f.name(index));
    quote! {
        #root::construct::check_names(#type_name, kwargs, &[#(#accepted),*])?;
    }
}

fn generate_inits(
    type_name: &str,
    fields: &[&FieldAttrs],
    root: &syn::Path,
) -> syn::Result<Vec<TokenStream>> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let member = field.member(index);
            let name = field.name(index);
            let default = match field.default_value(index)? {
                Some(DefaultValue::Expr(expr)) => Some(quote! { #expr }),
                Some(DefaultValue::Trait) => Some(quote! { ::std::default::Default::default() }),
                None if field.skip => Some(quote! { ::std::default::Default::default() }),
                None => None,
            };

            Ok(match default {
                Some(default) if field.skip => quote! { #member: #default },
                Some(default) => quote! {
                    #member: match #root::construct::optional(#type_name, #name, kwargs)? {
                        ::std::option::Option::Some(value) => value,
                        ::std::option::Option::None => #default,
                    }
                },
                None => quote! {
                    #member: #root::construct::required(#type_name, #name, kwargs)?
                },
            })
        })
        .collect()
}
