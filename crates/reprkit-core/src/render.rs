//! String, mapping, and attribute-listing views of introspectable values.
//!
//! Three views are produced from a type's [`Shape`](crate::describe::Shape):
//!
//! - string forms (`TypeName(field=value, ...)`, `TypeName.Variant(...)`) in
//!   declaration order, reshaped by the type's and variant's format templates
//! - a [`Mapping`] of visible fields ordered by field name
//! - the sorted list of visible attribute names
//!
//! Every view is built in a private buffer and only returned once complete, so
//! an instance that disagrees with its own description yields an
//! [`IntrospectError::InvariantViolation`] and never a partial rendering.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Write as _;
use std::rc::Rc;
use std::sync::{Arc, Mutex, RwLock};

use indexmap::{IndexMap, IndexSet};

use crate::describe::{FieldDesc, FieldSet, Form, FormatSegment, Introspect, ShapeKind, apply_format};
use crate::error::IntrospectError;
use crate::settings::render_settings;
use crate::value::{Mapping, Value};

/// Written in place of a variant hidden from the requested form.
pub const SKIPPED_VARIANT: &str = "<variant skipped>";

/// Values that can appear as a field of an introspectable type.
pub trait Render {
    /// Append this value's literal form.
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError>;

    /// Snapshot this value as a dynamic [`Value`].
    fn to_value(&self) -> Result<Value, IntrospectError>;
}

/// Renderer operations available on every [`Introspect`] type.
pub trait IntrospectExt: Introspect {
    /// The display (`str`) form.
    fn to_display_string(&self) -> Result<String, IntrospectError> {
        render_to_string(self, Form::Str)
    }

    /// The repr form.
    fn to_repr_string(&self) -> Result<String, IntrospectError> {
        render_to_string(self, Form::Repr)
    }

    /// Visible fields and their values, ordered by field name.
    fn to_mapping(&self) -> Result<Mapping, IntrospectError> {
        let Some(fields) = active_fields(self)? else {
            return Ok(Mapping::new());
        };
        let mut mapping = Mapping::new();
        for &name in fields.sorted_visible_names() {
            mapping.insert(name, field_of(self, name)?.to_value()?);
        }
        Ok(mapping)
    }

    /// Sorted names of the visible fields.
    fn visible_attribute_names(&self) -> Result<Vec<&'static str>, IntrospectError> {
        Ok(active_fields(self)?
            .map(|fields| fields.sorted_visible_names().to_vec())
            .unwrap_or_default())
    }

    /// Read one visible field by name.
    fn get_attribute(&self, name: &str) -> Result<Value, IntrospectError> {
        let visible = active_fields(self)?
            .and_then(|fields| fields.get(name))
            .is_some_and(FieldDesc::is_visible);
        if !visible {
            return Err(IntrospectError::attribute_not_found(owner_name(self), name));
        }
        field_of(self, name)?.to_value()
    }
}

impl<T: Introspect + ?Sized> IntrospectExt for T {}

fn render_to_string<T: Introspect + ?Sized>(
    instance: &T,
    form: Form,
) -> Result<String, IntrospectError> {
    let mut out = String::new();
    render_instance(instance, form, &mut out)?;
    Ok(out)
}

/// Field set of the active record or variant; `None` when the variant is hidden.
fn active_fields<T: Introspect + ?Sized>(
    instance: &T,
) -> Result<Option<&'static FieldSet>, IntrospectError> {
    let shape = instance.shape();
    let active = instance.active_variant();
    let fields = shape.field_set(active)?;
    let hidden = active
        .and_then(|name| shape.variant(name))
        .is_some_and(|variant| variant.hidden);
    Ok((!hidden).then_some(fields))
}

/// `Type` for records, `Type.Variant` for unions.
fn owner_name<T: Introspect + ?Sized>(instance: &T) -> String {
    let type_name = instance.shape().type_name;
    match instance.active_variant() {
        Some(variant) => format!("{type_name}.{variant}"),
        None => type_name.to_string(),
    }
}

fn field_of<'a, T: Introspect + ?Sized>(
    instance: &'a T,
    name: &str,
) -> Result<&'a dyn Render, IntrospectError> {
    instance.field(name).ok_or_else(|| {
        IntrospectError::invariant(
            instance.shape().type_name,
            format!("field `{name}` is described but not accessible"),
        )
    })
}

/// Render a record or union instance into `out`.
///
/// Derived [`Render`] impls delegate here. `out` is only extended when the
/// whole instance renders successfully.
pub fn render_instance<T: Introspect + ?Sized>(
    instance: &T,
    form: Form,
    out: &mut String,
) -> Result<(), IntrospectError> {
    let shape = instance.shape();
    let active = instance.active_variant();
    let fields = shape.field_set(active)?;

    let mut body = String::new();
    match (&shape.kind, active) {
        (ShapeKind::Union(_), Some(name)) => {
            let variant = shape.variant(name).ok_or_else(|| {
                IntrospectError::invariant(shape.type_name, format!("unknown variant `{name}`"))
            })?;
            if !variant.is_visible_in(form) {
                body.push_str(SKIPPED_VARIANT);
            } else {
                match variant.format {
                    Some(segments) => apply_format(segments, &[variant.name], &mut body),
                    None => body.push_str(variant.name),
                }
                if !variant.unit {
                    body.push('(');
                    render_fields(instance, fields, form, &mut body)?;
                    body.push(')');
                }
            }
        }
        _ => render_fields(instance, fields, form, &mut body)?,
    }

    apply_format(shape.template(), &[shape.type_name, &body], out);
    Ok(())
}

fn render_fields<T: Introspect + ?Sized>(
    instance: &T,
    fields: &FieldSet,
    form: Form,
    out: &mut String,
) -> Result<(), IntrospectError> {
    for (i, field) in fields.visible_in(form).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(field.name);
        out.push('=');
        let value = field_of(instance, field.name)?;
        match field.format {
            Some(segments) => render_formatted(value, segments, form, out)?,
            None => value.render(form, out)?,
        }
    }
    Ok(())
}

fn render_formatted(
    value: &dyn Render,
    segments: &[FormatSegment],
    form: Form,
    out: &mut String,
) -> Result<(), IntrospectError> {
    let text = render_one(value, form)?;
    apply_format(segments, &[&text], out);
    Ok(())
}

/// Join already rendered items, truncating after the configured item limit.
fn write_items(out: &mut String, open: &str, close: &str, items: &[String], total: usize) {
    out.push_str(open);
    out.push_str(&items.join(", "));
    if total > items.len() {
        if !items.is_empty() {
            out.push_str(", ");
        }
        out.push_str("...");
    }
    out.push_str(close);
}

fn render_ordered<'a, T, I>(
    items: I,
    total: usize,
    (open, close): (&str, &str),
    form: Form,
    out: &mut String,
) -> Result<(), IntrospectError>
where
    T: Render + ?Sized + 'a,
    I: Iterator<Item = &'a T>,
{
    let limit = render_settings().max_items;
    let rendered = items
        .take(limit)
        .map(|item| render_one(item, form))
        .collect::<Result<Vec<_>, _>>()?;
    write_items(out, open, close, &rendered, total);
    Ok(())
}

/// Hash-ordered containers are rendered sorted so output stays deterministic.
fn render_unordered<'a, T, I>(
    items: I,
    total: usize,
    (open, close): (&str, &str),
    form: Form,
    out: &mut String,
) -> Result<(), IntrospectError>
where
    T: Render + ?Sized + 'a,
    I: Iterator<Item = &'a T>,
{
    let mut rendered = items
        .map(|item| render_one(item, form))
        .collect::<Result<Vec<_>, _>>()?;
    rendered.sort();
    rendered.truncate(render_settings().max_items);
    write_items(out, open, close, &rendered, total);
    Ok(())
}

fn render_one<T: Render + ?Sized>(item: &T, form: Form) -> Result<String, IntrospectError> {
    let mut text = String::new();
    item.render(form, &mut text)?;
    Ok(text)
}

fn render_entry<K: Render, V: Render>(
    key: &K,
    value: &V,
    form: Form,
) -> Result<String, IntrospectError> {
    let mut text = render_one(key, form)?;
    text.push_str(": ");
    value.render(form, &mut text)?;
    Ok(text)
}

fn render_entries<'a, K, V, I>(
    entries: I,
    total: usize,
    sorted: bool,
    form: Form,
    out: &mut String,
) -> Result<(), IntrospectError>
where
    K: Render + 'a,
    V: Render + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    let limit = render_settings().max_items;
    let rendered = if sorted {
        let mut all = entries
            .map(|(k, v)| render_entry(k, v, form))
            .collect::<Result<Vec<_>, _>>()?;
        all.sort();
        all.truncate(limit);
        all
    } else {
        entries
            .take(limit)
            .map(|(k, v)| render_entry(k, v, form))
            .collect::<Result<Vec<_>, _>>()?
    };
    write_items(out, "{", "}", &rendered, total);
    Ok(())
}

fn list_value<'a, T, I>(items: I) -> Result<Value, IntrospectError>
where
    T: Render + ?Sized + 'a,
    I: Iterator<Item = &'a T>,
{
    Ok(Value::List(
        items.map(Render::to_value).collect::<Result<_, _>>()?,
    ))
}

fn map_value<'a, K, V, I>(entries: I, sorted: bool) -> Result<Value, IntrospectError>
where
    K: Render + 'a,
    V: Render + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    let mut pairs = entries
        .map(|(k, v)| Ok((k.to_value()?, v.to_value()?)))
        .collect::<Result<Vec<_>, IntrospectError>>()?;
    if sorted {
        pairs.sort_by_cached_key(|(k, _)| k.to_string());
    }
    Ok(Value::Map(pairs))
}

macro_rules! impl_render_for_literal {
    ($($ty:ty),*) => {
        $(
            impl Render for $ty {
                fn render(&self, _form: Form, out: &mut String) -> Result<(), IntrospectError> {
                    write_debug(self, out);
                    Ok(())
                }

                fn to_value(&self) -> Result<Value, IntrospectError> {
                    Ok(Value::from(*self))
                }
            }
        )*
    };
}

/// Rust literal notation; writing into a `String` cannot fail.
fn write_debug<T: std::fmt::Debug + ?Sized>(value: &T, out: &mut String) {
    let _ = write!(out, "{value:?}");
}

impl_render_for_literal!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool
);

impl Render for str {
    fn render(&self, _form: Form, out: &mut String) -> Result<(), IntrospectError> {
        write_debug(self, out);
        Ok(())
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        Ok(Value::from(self))
    }
}

impl Render for String {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        self.as_str().render(form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        Ok(Value::Str(self.clone()))
    }
}

impl Render for char {
    fn render(&self, _form: Form, out: &mut String) -> Result<(), IntrospectError> {
        write_debug(self, out);
        Ok(())
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        Ok(Value::Str(self.to_string()))
    }
}

impl<T: Render + ?Sized> Render for &T {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        (**self).render(form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        (**self).to_value()
    }
}

impl<T: Render + ?Sized> Render for Box<T> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        (**self).render(form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        (**self).to_value()
    }
}

impl<T: Render + ?Sized> Render for Arc<T> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        (**self).render(form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        (**self).to_value()
    }
}

impl<T: Render + ?Sized> Render for Rc<T> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        (**self).render(form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        (**self).to_value()
    }
}

fn poisoned(type_name: &str) -> IntrospectError {
    IntrospectError::invariant(type_name, "lock poisoned while rendering")
}

impl<T: Render> Render for RwLock<T> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        let guard = self.read().map_err(|_| poisoned("RwLock"))?;
        guard.render(form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        let guard = self.read().map_err(|_| poisoned("RwLock"))?;
        guard.to_value()
    }
}

impl<T: Render> Render for Mutex<T> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        let guard = self.lock().map_err(|_| poisoned("Mutex"))?;
        guard.render(form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        let guard = self.lock().map_err(|_| poisoned("Mutex"))?;
        guard.to_value()
    }
}

impl<T: Render> Render for Option<T> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        match self {
            Some(value) => value.render(form, out),
            None => {
                out.push_str("None");
                Ok(())
            }
        }
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        match self {
            Some(value) => value.to_value(),
            None => Ok(Value::None),
        }
    }
}

impl<T: Render> Render for [T] {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        render_ordered(self.iter(), self.len(), ("[", "]"), form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        list_value(self.iter())
    }
}

impl<T: Render, const N: usize> Render for [T; N] {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        self.as_slice().render(form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        self.as_slice().to_value()
    }
}

impl<T: Render> Render for Vec<T> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        self.as_slice().render(form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        self.as_slice().to_value()
    }
}

impl<T: Render> Render for VecDeque<T> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        render_ordered(self.iter(), self.len(), ("[", "]"), form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        list_value(self.iter())
    }
}

impl<T: Render> Render for BTreeSet<T> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        render_ordered(self.iter(), self.len(), ("{", "}"), form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        list_value(self.iter())
    }
}

impl<T: Render> Render for IndexSet<T> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        render_ordered(self.iter(), self.len(), ("{", "}"), form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        list_value(self.iter())
    }
}

impl<T: Render, S> Render for HashSet<T, S> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        render_unordered(self.iter(), self.len(), ("{", "}"), form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        let mut items = self
            .iter()
            .map(Render::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        items.sort_by_cached_key(|item| item.to_string());
        Ok(Value::List(items))
    }
}

impl<K: Render, V: Render> Render for BTreeMap<K, V> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        render_entries(self.iter(), self.len(), false, form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        map_value(self.iter(), false)
    }
}

impl<K: Render, V: Render, S> Render for IndexMap<K, V, S> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        render_entries(self.iter(), self.len(), false, form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        map_value(self.iter(), false)
    }
}

impl<K: Render, V: Render, S> Render for HashMap<K, V, S> {
    fn render(&self, form: Form, out: &mut String) -> Result<(), IntrospectError> {
        render_entries(self.iter(), self.len(), true, form, out)
    }

    fn to_value(&self) -> Result<Value, IntrospectError> {
        map_value(self.iter(), true)
    }
}
