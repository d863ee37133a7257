//! Derive-driven introspection for Rust records and unions.
//!
//! `#[derive(Introspect)]` gives a struct or enum three stable views:
//!
//! - string forms, `Person(name="Ada", age=36)` and `Address.House(...)`,
//!   in declaration order
//! - a [`Mapping`] of visible fields, ordered by name
//! - the sorted list of visible attribute names
//!
//! plus per-field access by name and keyword construction.
//!
//! # Example
//!
//! ```
//! use reprkit::{Introspect, IntrospectExt, Kwargs};
//!
//! #[derive(Clone, Introspect)]
//! struct Person {
//!     name: String,
//!     #[introspect(default)]
//!     age: u8,
//!     #[introspect(skip)]
//!     secret: String,
//! }
//!
//! let person = Person::from_kwargs(&Kwargs::new().with("name", "Ada")).unwrap();
//! assert_eq!(person.to_display_string().unwrap(), r#"Person(name="Ada", age=0)"#);
//! assert_eq!(person.visible_attribute_names().unwrap(), ["age", "name"]);
//! assert!(person.get_attribute("secret").is_err());
//! ```

extern crate self as reprkit;

pub mod telemetry;

pub use reprkit_core::{construct, describe, error, registry, render, settings, value};

pub use reprkit_core::{
    FieldDesc, FieldSet, Form, FormatSegment, FromValue, IntrospectError, IntrospectExt, Kwargs,
    Mapping, Object, OccupancyKey, Registry, RegistryConfig, RegistryError, Render,
    RenderSettings, SKIPPED_VARIANT, Shape, ShapeKind, Value, ValueError, VariantDesc,
    configure_render, render_instance, render_settings,
};

/// Structural access trait and its derive macro.
pub use reprkit_core::Introspect;
pub use reprkit_derive::Introspect;

pub use telemetry::{TelemetryInitError, init_tracing};
