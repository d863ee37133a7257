//! Core traits for structural introspection and rendering.
//!
//! This crate provides the runtime half of `reprkit`: type descriptions, the
//! renderer that turns them into string, mapping, and attribute-listing views,
//! the dynamic [`Value`] model, and the per-scope address occupancy
//! [`Registry`]. The `reprkit-derive` crate generates the [`Introspect`],
//! [`Render`], and [`FromValue`] impls used here.
//!
//! # Overview
//!
//! - [`Introspect`] - structural access to a record or union instance
//! - [`IntrospectExt`] - `to_display_string`, `to_repr_string`, `to_mapping`,
//!   `visible_attribute_names`, `get_attribute`
//! - [`Shape`] / [`FieldSet`] / [`FieldDesc`] - cached type descriptions
//! - [`Registry`] - occupancy set with an ordered two-registry move

pub mod construct;
pub mod describe;
pub mod error;
pub mod registry;
pub mod render;
pub mod settings;
pub mod value;

pub use describe::{FieldDesc, FieldSet, Form, FormatSegment, Introspect, Shape, ShapeKind, VariantDesc};
pub use error::{IntrospectError, RegistryError, ValueError};
pub use registry::{OccupancyKey, Registry, RegistryConfig};
pub use render::{IntrospectExt, Render, SKIPPED_VARIANT, render_instance};
pub use settings::{RenderSettings, configure_render, render_settings};
pub use value::{FromValue, Kwargs, Mapping, Object, Value};
