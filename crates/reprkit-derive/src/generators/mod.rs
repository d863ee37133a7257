//! Code generators for the Introspect derive macro.
//!
//! - `shape`: the cached `Shape` behind `Introspect::shape`
//! - `format`: field format templates, parsed at expansion time
//! - `introspect`: `Introspect`, `Render`, `FromValue`, and optional `Display` impls
//! - `construct`: `from_kwargs` / `from_variant_kwargs`

mod construct;
pub mod format;
mod introspect;
mod shape;

pub use construct::generate_constructor;
pub use introspect::generate_impls;
