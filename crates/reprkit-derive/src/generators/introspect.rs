//! `Introspect`, `Render`, and `FromValue` impl generation.

use proc_macro2::TokenStream;
use quote::quote;

use super::shape::generate_shape;
use crate::attrs::IntrospectAttrs;

/// Generate all trait impls for the derived type.
pub fn generate_impls(attrs: &IntrospectAttrs, root: &syn::Path) -> syn::Result<TokenStream> {
    let ident = &attrs.ident;
    let type_name = attrs.type_name();

    let shape_method = generate_shape(attrs, root)?;
    let (active_variant, field_method) = if attrs.is_union() {
        (
            Some(generate_active_variant(attrs)),
            generate_union_field(attrs, root)?,
        )
    } else {
        (None, generate_record_field(attrs, root)?)
    };

    // `fmt::Error` would make `to_string()` panic, so a failed render is
    // written as `<error>` instead.
    let display = attrs.display.then(|| {
        quote! {
            impl ::std::fmt::Display for #ident {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    match #root::IntrospectExt::to_display_string(self) {
                        ::std::result::Result::Ok(text) => f.write_str(&text),
                        ::std::result::Result::Err(err) => ::std::write!(f, "<{}>", err),
                    }
                }
            }
        }
    });

    Ok(quote! {
        impl #root::Introspect for #ident {
            #shape_method
            #active_variant
            #field_method
        }

        impl #root::Render for #ident {
            fn render(
                &self,
                form: #root::Form,
                out: &mut ::std::string::String,
            ) -> ::std::result::Result<(), #root::IntrospectError> {
                #root::render_instance(self, form, out)
            }

            fn to_value(&self) -> ::std::result::Result<#root::Value, #root::IntrospectError> {
                ::std::result::Result::Ok(#root::Value::object(::std::clone::Clone::clone(self)))
            }
        }

        impl #root::FromValue for #ident {
            fn from_value(value: &#root::Value) -> ::std::result::Result<Self, #root::ValueError> {
                value
                    .downcast_ref::<Self>()
                    .cloned()
                    .ok_or_else(|| #root::ValueError::TypeMismatch {
                        expected: #type_name,
                        found: value.kind(),
                    })
            }
        }

        #display
    })
}

fn generate_active_variant(attrs: &IntrospectAttrs) -> TokenStream {
    let arms = attrs.variants().map(|variant| {
        let ident = &variant.ident;
        let name = variant.name();
        if variant.is_unit() {
            quote! { Self::#ident => #name }
        } else {
            quote! { Self::#ident { .. } => #name }
        }
    });

    quote! {
        fn active_variant(&self) -> ::std::option::Option<&'static str> {
            ::std::option::Option::Some(match self {
                #(#arms),*
            })
        }
    }
}

fn generate_record_field(attrs: &IntrospectAttrs, root: &syn::Path) -> syn::Result<TokenStream> {
    let mut arms = Vec::new();
    for (index, field) in attrs.fields().enumerate().filter(|(_, f)| !f.skip) {
        let member = field.member(index);
        let name = field.name(index);
        arms.push(quote! {
            #name => ::std::option::Option::Some(&self.#member as &dyn #root::Render),
        });
    }

    Ok(quote! {
        fn field(&self, name: &str) -> ::std::option::Option<&dyn #root::Render> {
            match name {
                #(#arms)*
                _ => ::std::option::Option::None,
            }
        }
    })
}

fn generate_union_field(attrs: &IntrospectAttrs, root: &syn::Path) -> syn::Result<TokenStream> {
    let mut arms = Vec::new();
    for variant in attrs.variants().filter(|v| !v.skip) {
        let variant_ident = &variant.ident;
        for (index, field) in variant.fields.iter().enumerate().filter(|(_, f)| !f.skip) {
            let member = field.member(index);
            let name = field.name(index);
            arms.push(quote! {
                (Self::#variant_ident { #member: value, .. }, #name) => {
                    ::std::option::Option::Some(value as &dyn #root::Render)
                }
            });
        }
    }

    Ok(quote! {
        fn field(&self, name: &str) -> ::std::option::Option<&dyn #root::Render> {
            match (self, name) {
                #(#arms)*
                _ => ::std::option::Option::None,
            }
        }
    })
}
