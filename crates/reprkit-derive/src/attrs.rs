//! Attribute parsing for `#[derive(Introspect)]` using darling.
//!
//! This module defines the attribute structs for parsing `#[introspect(...)]`
//! attributes at the container, variant, and field levels.

use darling::ast::{Data, Fields};
use darling::util::Override;
use darling::{FromDeriveInput, FromField, FromVariant};
use syn::ext::IdentExt as _;
use syn::{Ident, Index, Member, Type, Visibility};

/// Container-level attributes.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Introspect)]
/// #[introspect(name = "Address", display, format = "{}: {}")]
/// pub enum PostalAddress {
///     House { country: String, city: String, street: String, street_number: u32 },
/// }
/// ```
#[derive(Debug, FromDeriveInput)]
#[darling(
    attributes(introspect),
    supports(struct_named, struct_newtype, struct_tuple, enum_named, enum_unit)
)]
pub struct IntrospectAttrs {
    pub ident: Ident,
    pub vis: Visibility,
    pub generics: syn::Generics,
    pub data: Data<VariantAttrs, FieldAttrs>,

    /// Displayed type name, defaults to the Rust identifier.
    #[darling(default)]
    pub name: Option<String>,

    /// Also implement `std::fmt::Display` with the display form.
    #[darling(default)]
    pub display: bool,

    /// Template for the whole string form: `{0}` is the type name, `{1}` the
    /// fields of a record or the rendered variant of a union.
    #[darling(default)]
    pub format: Option<String>,
}

/// Variant-level attributes for unions.
#[derive(Debug, Clone, FromVariant)]
#[darling(attributes(introspect))]
pub struct VariantAttrs {
    pub ident: Ident,
    pub fields: Fields<FieldAttrs>,

    /// Render as `<variant skipped>` in both string forms and hide all fields.
    #[darling(default)]
    pub skip: bool,
    #[darling(default)]
    pub skip_str: bool,
    #[darling(default)]
    pub skip_repr: bool,

    /// Template for the variant name, `{}` stands for the name.
    #[darling(default)]
    pub format: Option<String>,
}

/// Field-level attributes.
#[derive(Debug, Clone, FromField)]
#[darling(attributes(introspect))]
pub struct FieldAttrs {
    pub ident: Option<Ident>,
    pub ty: Type,

    /// Hide from every output and from attribute access and construction.
    #[darling(default)]
    pub skip: bool,
    /// Hide from the display form only.
    #[darling(default)]
    pub skip_str: bool,
    /// Hide from the repr form only.
    #[darling(default)]
    pub skip_repr: bool,

    /// `default` uses `Default::default()`, `default = "expr"` uses `expr`.
    #[darling(default)]
    pub default: Option<Override<String>>,

    /// Wrapper template for string forms, `{}` stands for the value.
    #[darling(default)]
    pub format: Option<String>,
}

/// How an omitted field gets its value during construction.
pub enum DefaultValue {
    Trait,
    Expr(syn::Expr),
}

impl IntrospectAttrs {
    /// Returns the displayed type name (either explicit or derived from ident).
    pub fn type_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.ident.to_string())
    }

    pub fn is_union(&self) -> bool {
        self.data.is_enum()
    }

    /// Record fields, empty for unions.
    ///
    /// Fields of a tuple struct are named by position: `"0"`, `"1"`, ...
    pub fn fields(&self) -> impl Iterator<Item = &FieldAttrs> {
        self.data
            .as_ref()
            .take_struct()
            .into_iter()
            .flat_map(|fields| fields.fields)
    }

    /// Union variants, empty for records.
    pub fn variants(&self) -> impl Iterator<Item = &VariantAttrs> {
        self.data.as_ref().take_enum().into_iter().flatten()
    }

    /// Validate container, variant, and field attributes.
    ///
    /// Returns a list of validation errors, or empty vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.generics.params.is_empty() {
            errors.push(format!(
                "`{}`: #[derive(Introspect)] does not support generic parameters",
                self.ident
            ));
        }
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            errors.push(format!("`{}`: `name` cannot be empty", self.ident));
        }

        if self.is_union() && self.variants().next().is_none() {
            errors.push(format!("`{}`: enums without variants cannot be introspected", self.ident));
        }

        for (index, field) in self.fields().enumerate() {
            errors.extend(field.validate(index));
        }
        for variant in self.variants() {
            if variant.skip && variant.format.is_some() {
                errors.push(format!(
                    "variant `{}`: `format` has no effect on a skipped variant",
                    variant.ident
                ));
            }
            for (index, field) in variant.fields.iter().enumerate() {
                errors.extend(field.validate(index));
            }
        }

        errors
    }
}

impl VariantAttrs {
    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    pub fn is_unit(&self) -> bool {
        self.fields.is_unit()
    }
}

impl FieldAttrs {
    /// How the field at `index` is accessed: `self.name` or `self.0`.
    pub fn member(&self, index: usize) -> Member {
        match &self.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(index)),
        }
    }

    /// The field name, or its position for tuple fields.
    pub fn name(&self, index: usize) -> String {
        match &self.ident {
            Some(ident) => ident.unraw().to_string(),
            None => index.to_string(),
        }
    }

    pub fn default_value(&self, index: usize) -> syn::Result<Option<DefaultValue>> {
        match &self.default {
            None => Ok(None),
            Some(Override::Inherit) => Ok(Some(DefaultValue::Trait)),
            Some(Override::Explicit(expr)) => syn::parse_str(expr)
                .map(|expr| Some(DefaultValue::Expr(expr)))
                .map_err(|err| {
                    syn::Error::new_spanned(
                        &self.ty,
                        format!("field `{}`: invalid default expression: {err}", self.name(index)),
                    )
                }),
        }
    }

    fn validate(&self, index: usize) -> Vec<String> {
        let mut errors = Vec::new();
        if self.skip && (self.skip_str || self.skip_repr) {
            errors.push(format!(
                "field `{}`: `skip` already hides the field from every form",
                self.name(index)
            ));
        }
        if self.skip && self.format.is_some() {
            errors.push(format!(
                "field `{}`: `format` has no effect on a skipped field",
                self.name(index)
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darling::FromDeriveInput;
    use syn::parse_quote;

    #[test]
    fn test_record_parsing() {
        let input: syn::DeriveInput = parse_quote! {
            #[introspect(display)]
            pub struct Person {
                pub name: String,
                #[introspect(default)]
                pub age: u8,
                #[introspect(skip, default = "None")]
                pub residence: Option<City>,
            }
        };

        let attrs = IntrospectAttrs::from_derive_input(&input).unwrap();
        assert_eq!(attrs.type_name(), "Person");
        assert!(attrs.display);
        assert!(!attrs.is_union());

        let fields: Vec<_> = attrs.fields().collect();
        assert_eq!(fields.len(), 3);
        assert!(matches!(fields[1].default_value(1), Ok(Some(DefaultValue::Trait))));
        assert!(fields[2].skip);
        assert!(matches!(fields[2].default_value(2), Ok(Some(DefaultValue::Expr(_)))));
        assert!(attrs.validate().is_empty());
    }

    #[test]
    fn test_union_parsing_with_name_override() {
        let input: syn::DeriveInput = parse_quote! {
            #[introspect(name = "Address", format = "{1}")]
            pub enum PostalAddress {
                House { country: String, #[introspect(format = "No. {}")] street_number: u32 },
                #[introspect(skip_repr, format = "Unknown address")]
                Unknown,
            }
        };

        let attrs = IntrospectAttrs::from_derive_input(&input).unwrap();
        assert_eq!(attrs.type_name(), "Address");
        assert!(attrs.is_union());
        assert_eq!(attrs.format.as_deref(), Some("{1}"));

        let variants: Vec<_> = attrs.variants().collect();
        assert_eq!(variants[0].name(), "House");
        assert!(!variants[0].is_unit());
        assert_eq!(variants[0].fields.fields[1].format.as_deref(), Some("No. {}"));
        assert!(variants[1].is_unit());
        assert!(variants[1].skip_repr);
        assert_eq!(variants[1].format.as_deref(), Some("Unknown address"));
        assert!(attrs.validate().is_empty());
    }

    #[test]
    fn test_tuple_struct_fields_are_named_by_position() {
        let input: syn::DeriveInput = parse_quote! {
            pub struct Reading(u32, #[introspect(format = "[{}]")] f32);
        };

        let attrs = IntrospectAttrs::from_derive_input(&input).unwrap();
        let fields: Vec<_> = attrs.fields().collect();
        assert_eq!(fields[0].name(0), "0");
        assert_eq!(fields[1].name(1), "1");
        assert_eq!(fields[1].member(1), Member::Unnamed(Index::from(1)));
        assert!(attrs.validate().is_empty());

        let newtype: syn::DeriveInput = parse_quote! {
            pub struct Meters(f64);
        };
        assert!(IntrospectAttrs::from_derive_input(&newtype).is_ok());
    }

    #[test]
    fn test_tuple_variants_are_rejected() {
        let input: syn::DeriveInput = parse_quote! {
            pub enum Shape {
                Circle(f64),
            }
        };
        assert!(IntrospectAttrs::from_derive_input(&input).is_err());
    }

    #[test]
    fn test_format_on_skipped_variant_is_rejected() {
        let input: syn::DeriveInput = parse_quote! {
            pub enum Mode {
                #[introspect(skip, format = "hidden")]
                Secret,
                Open,
            }
        };

        let attrs = IntrospectAttrs::from_derive_input(&input).unwrap();
        let errors = attrs.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("skipped variant"));
    }

    #[test]
    fn test_validation_rejects_generics_and_redundant_skips() {
        let input: syn::DeriveInput = parse_quote! {
            pub struct Wrapper<T> {
                #[introspect(skip, skip_str)]
                pub inner: T,
            }
        };

        let attrs = IntrospectAttrs::from_derive_input(&input).unwrap();
        let errors = attrs.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("generic parameters"));
        assert!(errors[1].contains("`skip` already hides"));
    }

    #[test]
    fn test_invalid_default_expression() {
        let input: syn::DeriveInput = parse_quote! {
            pub struct Person {
                #[introspect(default = "1 +")]
                pub age: u8,
            }
        };

        let attrs = IntrospectAttrs::from_derive_input(&input).unwrap();
        let field = attrs.fields().next().unwrap();
        assert!(field.default_value(0).is_err());
    }
}
