//! Derive macro for reprkit introspection.
//!
//! `#[derive(Introspect)]` generates, for a struct with named or tuple fields
//! or an enum with named or unit variants:
//!
//! - `Introspect` with a cached `Shape`, the active variant, and field access
//! - `Render` delegating to `reprkit::render_instance`
//! - `FromValue` so the type can nest inside other introspectable types
//! - `from_kwargs` (structs) or `from_variant_kwargs` (enums)
//! - `Display` when `#[introspect(display)]` is set
//!
//! Derived types must be `Clone + Send + Sync + 'static`.

use darling::FromDeriveInput;
use proc_macro::TokenStream;
use syn::parse_macro_input;

mod attrs;
mod generators;
mod runtime_path;

/// Derive structural introspection for a struct or enum.
///
/// # Container Attributes
///
/// - `#[introspect(name = "...")]` - Displayed type name
/// - `#[introspect(display)]` - Implement `Display` with the display form; a
///   failed render is written as `<error message>`
/// - `#[introspect(format = "{}({})")]` - Template for the whole string form:
///   `{0}` is the type name, `{1}` the fields (structs) or the variant (enums).
///   Defaults are `{}({})` and `{}.{}`
///
/// # Variant Attributes
///
/// - `#[introspect(skip)]` - Render as `<variant skipped>` and expose no fields
/// - `#[introspect(skip_str)]` / `#[introspect(skip_repr)]` - Skip in one form only
/// - `#[introspect(format = "Enum {}")]` - Template for the variant name
///
/// Tuple struct fields are named by position, `0`, `1`, ...
///
/// # Field Attributes
///
/// - `#[introspect(skip)]` - Hide from every output, attribute access, and construction
/// - `#[introspect(skip_str)]` / `#[introspect(skip_repr)]` - Hide from one string form
/// - `#[introspect(default)]` / `#[introspect(default = "expr")]` - Value when omitted
/// - `#[introspect(format = "A[{}]")]` - Wrap the rendered value in string forms
///
/// Templates use `{}` or positions such as `{1}`, with `{{` / `}}` for braces.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Introspect)]
/// #[introspect(display)]
/// pub struct Person {
///     pub name: String,
///     pub age: u8,
///     #[introspect(skip)]
///     pub residence: Option<City>,
/// }
/// ```
#[proc_macro_derive(Introspect, attributes(introspect))]
pub fn derive_introspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);

    match expand_derive_introspect(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_derive_introspect(input: &syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let attrs = attrs::IntrospectAttrs::from_derive_input(input)
        .map_err(|e| syn::Error::new_spanned(input, e.to_string()))?;

    let validation_errors = attrs.validate();
    if !validation_errors.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            validation_errors.join("; "),
        ));
    }

    let root = runtime_path::resolve_reprkit_path()?;
    let impls = generators::generate_impls(&attrs, &root)?;
    let constructor = generators::generate_constructor(&attrs, &root)?;

    let mut output = proc_macro2::TokenStream::new();
    output.extend(impls);
    output.extend(constructor);

    Ok(output)
}
