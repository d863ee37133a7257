//! Structural type descriptions for introspectable types.
//!
//! A [`Shape`] describes a record (struct with named fields) or a union (enum
//! whose variants each own a [`FieldSet`]). Shapes are built once per type,
//! usually by `#[derive(Introspect)]`, and cached for the life of the process.
//!
//! # Example
//!
//! ```
//! use reprkit_core::describe::{FieldDesc, FieldSet, Shape};
//!
//! let shape = Shape::record(
//!     "Person",
//!     FieldSet::new(vec![
//!         FieldDesc::new("name", "String"),
//!         FieldDesc::new("age", "u8"),
//!         FieldDesc::new("secret", "String").hidden(),
//!     ]),
//! );
//!
//! let fields = shape.field_set(None).unwrap();
//! assert_eq!(fields.sorted_visible_names(), ["age", "name"]);
//! ```

use crate::error::IntrospectError;
use crate::render::Render;

/// Which string form is being produced.
///
/// The two forms share one grammar and differ only in which fields or
/// variants they hide (`skip_str` / `skip_repr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    /// Display form, the `str()` view.
    Str,
    /// Debug form, the `repr()` view.
    Repr,
}

/// Piece of a compiled format template such as `A[{}]`.
///
/// Field templates get the rendered value as argument 0. Variant templates get
/// the variant name. Type templates get the type name and the rendered body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSegment {
    /// Literal text, output as-is.
    Literal(&'static str),
    /// Positional argument.
    Arg(usize),
}

/// `Type(fields)`
pub const RECORD_FORMAT: &[FormatSegment] = &[
    FormatSegment::Arg(0),
    FormatSegment::Literal("("),
    FormatSegment::Arg(1),
    FormatSegment::Literal(")"),
];

/// `Type.Variant(fields)`
pub const UNION_FORMAT: &[FormatSegment] = &[
    FormatSegment::Arg(0),
    FormatSegment::Literal("."),
    FormatSegment::Arg(1),
];

/// Write `segments` to `out`, substituting `args` by position.
///
/// Arguments missing from `args` are written as nothing.
pub fn apply_format(segments: &[FormatSegment], args: &[&str], out: &mut String) {
    for segment in segments {
        match *segment {
            FormatSegment::Literal(text) => out.push_str(text),
            FormatSegment::Arg(index) => {
                if let Some(arg) = args.get(index) {
                    out.push_str(arg);
                }
            }
        }
    }
}

/// Description of a single field.
///
/// Tuple struct fields are named by position: `"0"`, `"1"`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDesc {
    /// The field name as declared.
    pub name: &'static str,
    /// Source text of the field's type.
    pub type_name: &'static str,
    /// Hidden from every introspection output and from attribute access.
    pub hidden: bool,
    /// Hidden from the display form only.
    pub skip_str: bool,
    /// Hidden from the repr form only.
    pub skip_repr: bool,
    /// Whether construction may omit this field.
    pub has_default: bool,
    /// Optional wrapper applied to the rendered value in string forms.
    pub format: Option<&'static [FormatSegment]>,
}

impl FieldDesc {
    pub const fn new(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            hidden: false,
            skip_str: false,
            skip_repr: false,
            has_default: false,
            format: None,
        }
    }

    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub const fn skip_str(mut self) -> Self {
        self.skip_str = true;
        self
    }

    pub const fn skip_repr(mut self) -> Self {
        self.skip_repr = true;
        self
    }

    pub const fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub const fn with_format(mut self, format: &'static [FormatSegment]) -> Self {
        self.format = Some(format);
        self
    }

    /// True when the field belongs in the mapping and attribute listing.
    pub const fn is_visible(&self) -> bool {
        !self.hidden
    }

    /// True when the field belongs in the given string form.
    pub const fn is_visible_in(&self, form: Form) -> bool {
        if self.hidden {
            return false;
        }
        match form {
            Form::Str => !self.skip_str,
            Form::Repr => !self.skip_repr,
        }
    }
}

/// Ordered set of fields for a record or a union variant.
///
/// Keeps declaration order for string rendering and a precomputed,
/// lexicographically sorted list of visible names for listings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSet {
    fields: Vec<FieldDesc>,
    sorted_visible: Vec<&'static str>,
}

impl FieldSet {
    pub fn new(fields: Vec<FieldDesc>) -> Self {
        debug_assert!(
            fields
                .iter()
                .enumerate()
                .all(|(i, f)| fields[..i].iter().all(|g| g.name != f.name)),
            "field names must be unique"
        );

        let mut sorted_visible: Vec<&'static str> = fields
            .iter()
            .filter(|f| f.is_visible())
            .map(|f| f.name)
            .collect();
        sorted_visible.sort_unstable();

        Self {
            fields,
            sorted_visible,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// All fields, hidden ones included, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDesc> {
        self.fields.iter()
    }

    /// Fields rendered in the given string form, in declaration order.
    pub fn visible_in(&self, form: Form) -> impl Iterator<Item = &FieldDesc> {
        self.fields.iter().filter(move |f| f.is_visible_in(form))
    }

    /// Visible field names, sorted.
    pub fn sorted_visible_names(&self) -> &[&'static str] {
        &self.sorted_visible
    }

    pub fn get(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Description of one union variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDesc {
    pub name: &'static str,
    pub fields: FieldSet,
    /// Unit variants render without parentheses.
    pub unit: bool,
    pub hidden: bool,
    pub skip_str: bool,
    pub skip_repr: bool,
    /// Replaces the variant name in string forms.
    pub format: Option<&'static [FormatSegment]>,
}

impl VariantDesc {
    pub fn new(name: &'static str, fields: FieldSet) -> Self {
        Self {
            name,
            fields,
            unit: false,
            hidden: false,
            skip_str: false,
            skip_repr: false,
            format: None,
        }
    }

    pub fn unit(name: &'static str) -> Self {
        Self {
            unit: true,
            ..Self::new(name, FieldSet::empty())
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn skip_str(mut self) -> Self {
        self.skip_str = true;
        self
    }

    pub fn skip_repr(mut self) -> Self {
        self.skip_repr = true;
        self
    }

    pub fn with_format(mut self, format: &'static [FormatSegment]) -> Self {
        self.format = Some(format);
        self
    }

    pub fn is_visible_in(&self, form: Form) -> bool {
        if self.hidden {
            return false;
        }
        match form {
            Form::Str => !self.skip_str,
            Form::Repr => !self.skip_repr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Record(FieldSet),
    Union(Vec<VariantDesc>),
}

/// Complete structural description of an introspectable type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub type_name: &'static str,
    pub kind: ShapeKind,
    /// Template for the whole string form, see [`Shape::template`].
    pub format: Option<&'static [FormatSegment]>,
}

impl Shape {
    pub fn record(type_name: &'static str, fields: FieldSet) -> Self {
        Self {
            type_name,
            kind: ShapeKind::Record(fields),
            format: None,
        }
    }

    pub fn union(type_name: &'static str, variants: Vec<VariantDesc>) -> Self {
        Self {
            type_name,
            kind: ShapeKind::Union(variants),
            format: None,
        }
    }

    pub fn with_format(mut self, format: &'static [FormatSegment]) -> Self {
        self.format = Some(format);
        self
    }

    /// Template for string forms: argument 0 is the type name, argument 1 the
    /// rendered fields of a record or the rendered variant of a union.
    pub fn template(&self) -> &'static [FormatSegment] {
        match (self.format, &self.kind) {
            (Some(format), _) => format,
            (None, ShapeKind::Record(_)) => RECORD_FORMAT,
            (None, ShapeKind::Union(_)) => UNION_FORMAT,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self.kind, ShapeKind::Union(_))
    }

    pub fn variant(&self, name: &str) -> Option<&VariantDesc> {
        match &self.kind {
            ShapeKind::Record(_) => None,
            ShapeKind::Union(variants) => variants.iter().find(|v| v.name == name),
        }
    }

    /// Resolve the field set for an instance whose active variant is `active`.
    ///
    /// Records must report no active variant; unions must report one of their
    /// declared variants. Anything else means the instance disagrees with its
    /// own description.
    pub fn field_set(&self, active: Option<&str>) -> Result<&FieldSet, IntrospectError> {
        match (&self.kind, active) {
            (ShapeKind::Record(fields), None) => Ok(fields),
            (ShapeKind::Record(_), Some(variant)) => Err(IntrospectError::invariant(
                self.type_name,
                format!("record reported active variant `{variant}`"),
            )),
            (ShapeKind::Union(_), Some(variant)) => self
                .variant(variant)
                .map(|v| &v.fields)
                .ok_or_else(|| {
                    IntrospectError::invariant(
                        self.type_name,
                        format!("unknown active variant `{variant}`"),
                    )
                }),
            (ShapeKind::Union(_), None) => Err(IntrospectError::invariant(
                self.type_name,
                "union reported no active variant",
            )),
        }
    }
}

/// Structural access to a record or union instance.
///
/// Implemented by `#[derive(Introspect)]`. Rendering, mapping, and attribute
/// listing are provided on top of it by [`IntrospectExt`](crate::render::IntrospectExt).
pub trait Introspect: Render {
    /// The cached description of this type.
    fn shape(&self) -> &'static Shape;

    /// Name of the active variant for unions, `None` for records.
    fn active_variant(&self) -> Option<&'static str> {
        None
    }

    /// Borrow a visible field of the active record or variant.
    ///
    /// Hidden fields are never returned.
    fn field(&self, name: &str) -> Option<&dyn Render>;
}
