//! Helpers behind the derived `from_kwargs` / `from_variant_kwargs` constructors.
//!
//! Derived constructors first reject unknown names with [`check_names`], then
//! read each field in declaration order with [`required`] or [`optional`].

use tracing::trace;

use crate::error::IntrospectError;
use crate::value::{FromValue, Kwargs};

/// Fail on the first keyword that is not an accepted field name.
///
/// Hidden fields are never accepted, so naming one fails the same way as an
/// unknown name.
pub fn check_names(
    type_name: &'static str,
    kwargs: &Kwargs,
    accepted: &[&str],
) -> Result<(), IntrospectError> {
    match kwargs.names().find(|name| !accepted.contains(name)) {
        Some(unknown) => Err(IntrospectError::attribute_not_found(type_name, unknown)),
        None => Ok(()),
    }
}

/// Read a field that has no default.
pub fn required<T: FromValue>(
    type_name: &'static str,
    field: &'static str,
    kwargs: &Kwargs,
) -> Result<T, IntrospectError> {
    optional(type_name, field, kwargs)?
        .ok_or(IntrospectError::MissingField { type_name, field })
}

/// Read a field that may be omitted. `Ok(None)` means the caller applies the default.
pub fn optional<T: FromValue>(
    type_name: &'static str,
    field: &'static str,
    kwargs: &Kwargs,
) -> Result<Option<T>, IntrospectError> {
    let Some(value) = kwargs.get(field) else {
        trace!(type_name, field, "keyword omitted");
        return Ok(None);
    };
    T::from_value(value)
        .map(Some)
        .map_err(|err| err.for_field(type_name, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_names_are_reported_first_seen() {
        let kwargs = Kwargs::new().with("name", "x").with("nickname", "y");
        assert_eq!(
            check_names("Person", &kwargs, &["name", "age"]),
            Err(IntrospectError::AttributeNotFound {
                type_name: "Person".to_string(),
                attribute: "nickname".to_string(),
            })
        );
        assert!(check_names("Person", &Kwargs::new().with("age", 3u8), &["name", "age"]).is_ok());
    }

    #[test]
    fn required_reports_missing_and_range() {
        let kwargs = Kwargs::new().with("street_number", Value::Int(-1));
        assert_eq!(
            required::<String>("Address.House", "street", &kwargs),
            Err(IntrospectError::MissingField {
                type_name: "Address.House",
                field: "street",
            })
        );
        assert_eq!(
            required::<u32>("Address.House", "street_number", &kwargs),
            Err(IntrospectError::Range {
                type_name: "Address.House",
                field: "street_number",
                value: "-1".to_string(),
                target: "u32",
            })
        );
    }

    #[test]
    fn optional_distinguishes_absent_from_present() {
        let kwargs = Kwargs::new().with("age", 0u8);
        assert_eq!(optional::<u8>("Person", "age", &kwargs), Ok(Some(0)));
        assert_eq!(optional::<u8>("Person", "name", &kwargs), Ok(None));
    }
}
