//! Dynamic values for mappings, attribute access, and keyword construction.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::fmt::Write as _;
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::describe::Introspect;
use crate::error::ValueError;
use crate::render::IntrospectExt;

/// A nested record or union instance held inside a [`Value`].
pub trait Object: Introspect + Send + Sync + Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Introspect + Send + Sync + 'static> Object for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Dynamically typed field value.
///
/// Nested records and unions stay whole as [`Value::Object`]; their display is
/// their own repr string, such as `TypeName.Variant(...)`, rather than a
/// nested mapping.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i128),
    UInt(u128),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Object(Arc<dyn Object>),
}

impl Value {
    pub fn object<T: Object>(value: T) -> Self {
        Value::Object(Arc::new(value))
    }

    /// Short name of the value's kind, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast a nested instance to its concrete type.
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        match self {
            Value::Object(object) => object.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

/// Nested objects show their repr form, like values inside a Python dict.
fn object_text(object: &dyn Object) -> String {
    object
        .to_repr_string()
        .unwrap_or_else(|_| format!("<{} object>", object.shape().type_name))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Int(a), Value::UInt(b)) | (Value::UInt(b), Value::Int(a)) => {
                u128::try_from(*a).is_ok_and(|a| a == *b)
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.shape().type_name == b.shape().type_name
                    && object_text(a.as_ref()) == object_text(b.as_ref())
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::UInt(n) => f.debug_tuple("UInt").field(n).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Object(object) => f
                .debug_tuple("Object")
                .field(&format_args!("{}", object_text(object.as_ref())))
                .finish(),
        }
    }
}

/// Python literal notation: `'text'`, `True`, `None`, `[1, 2]`, `{'k': v}`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Float(x) => f.write_str(&python_float(*x)),
            Value::Str(s) => f.write_str(&python_quote(s)),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Object(object) => f.write_str(&object_text(object.as_ref())),
        }
    }
}

fn python_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else {
        format!("{x:?}")
    }
}

/// Quote a string the way Python's `repr` does.
pub fn python_quote(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Field name to value mapping of one instance, ordered by field name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: IndexMap<&'static str, Value>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: Value) {
        self.entries.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<&'static str, Value> {
        self.entries
    }
}

impl FromIterator<(&'static str, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (&'static str, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {value}", python_quote(name))?;
        }
        f.write_str("}")
    }
}

/// Named arguments for keyword construction, in the order they were supplied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kwargs {
    values: IndexMap<String, Value>,
}

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Conversion out of a dynamic [`Value`], checking numeric ranges.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

fn mismatch(expected: &'static str, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

macro_rules! impl_value_for_int {
    ($variant:ident => $wide:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as $wide)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, ValueError> {
                    let out_of_range = |text: String| ValueError::Range {
                        value: text,
                        target: stringify!($ty),
                    };
                    match value {
                        Value::Int(n) => <$ty>::try_from(*n).map_err(|_| out_of_range(n.to_string())),
                        Value::UInt(n) => <$ty>::try_from(*n).map_err(|_| out_of_range(n.to_string())),
                        other => Err(mismatch("integer", other)),
                    }
                }
            }
        )*
    };
}

impl_value_for_int!(Int => i128: i8, i16, i32, i64, i128, isize);
impl_value_for_int!(UInt => u128: u8, u16, u32, u64, u128, usize);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(n) => Ok(*n as f64),
            Value::UInt(n) => Ok(*n as f64),
            other => Err(mismatch("float", other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let x = f64::from_value(value)?;
        if x.is_finite() && x.abs() > f64::from(f32::MAX) {
            return Err(ValueError::Range {
                value: format!("{x:?}"),
                target: "f32",
            });
        }
        Ok(x as f32)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            other => Err(mismatch("string", other)),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::None => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            other => Err(mismatch("list", other)),
        }
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: FromValue> FromValue for Arc<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        T::from_value(value).map(Arc::new)
    }
}

impl<T: FromValue> FromValue for std::sync::RwLock<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        T::from_value(value).map(std::sync::RwLock::new)
    }
}

impl<T: FromValue> FromValue for std::sync::Mutex<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        T::from_value(value).map(std::sync::Mutex::new)
    }
}

impl<T: FromValue> FromValue for Rc<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        T::from_value(value).map(Rc::new)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Str(value.to_string())
    }
}

impl FromValue for char {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let mut chars = value.as_str().ok_or_else(|| mismatch("char", value))?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(mismatch("char", value)),
        }
    }
}

fn list_items<'a>(value: &'a Value, expected: &'static str) -> Result<&'a [Value], ValueError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(mismatch(expected, other)),
    }
}

fn map_entries<'a>(
    value: &'a Value,
    expected: &'static str,
) -> Result<&'a [(Value, Value)], ValueError> {
    match value {
        Value::Map(entries) => Ok(entries),
        other => Err(mismatch(expected, other)),
    }
}

fn entry<K: FromValue, V: FromValue>(key: &Value, value: &Value) -> Result<(K, V), ValueError> {
    Ok((K::from_value(key)?, V::from_value(value)?))
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let items = Vec::<T>::from_value(value)?;
        let found = items.len();
        items.try_into().map_err(|_| ValueError::Range {
            value: format!("{found} items"),
            target: "fixed-size array",
        })
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        list_items(value, "list")?.iter().map(T::from_value).collect()
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        list_items(value, "set")?.iter().map(T::from_value).collect()
    }
}

impl<T: FromValue + Eq + Hash, S: BuildHasher + Default> FromValue for HashSet<T, S> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        list_items(value, "set")?.iter().map(T::from_value).collect()
    }
}

impl<T: FromValue + Eq + Hash, S: BuildHasher + Default> FromValue for IndexSet<T, S> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        list_items(value, "set")?.iter().map(T::from_value).collect()
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        map_entries(value, "map")?
            .iter()
            .map(|(k, v)| entry::<K, V>(k, v))
            .collect()
    }
}

impl<K, V, S> FromValue for HashMap<K, V, S>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        map_entries(value, "map")?
            .iter()
            .map(|(k, v)| entry::<K, V>(k, v))
            .collect()
    }
}

impl<K, V, S> FromValue for IndexMap<K, V, S>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        map_entries(value, "map")?
            .iter()
            .map(|(k, v)| entry::<K, V>(k, v))
            .collect()
    }
}

impl<K: Into<Value>, V: Into<Value>, S> From<HashMap<K, V, S>> for Value {
    fn from(value: HashMap<K, V, S>) -> Self {
        Value::Map(value.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(value: BTreeMap<K, V>) -> Self {
        Value::Map(value.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
