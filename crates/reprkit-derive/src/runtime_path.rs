use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::Span;

pub(crate) fn resolve_reprkit_path() -> syn::Result<syn::Path> {
    match crate_name("reprkit") {
        // `crate` would point at the test or binary target inside the reprkit
        // package; the `extern crate self as reprkit` alias keeps this stable.
        Ok(FoundCrate::Itself) => Ok(syn::parse_quote!(::reprkit)),
        Ok(FoundCrate::Name(name)) => {
            let ident = syn::Ident::new(&name.replace('-', "_"), Span::call_site());
            Ok(syn::parse_quote!(::#ident))
        }
        Err(_) => Err(syn::Error::new(
            Span::call_site(),
            "could not resolve `reprkit`; add it as a dependency (renamed dependencies are supported)",
        )),
    }
}
