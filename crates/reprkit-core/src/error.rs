use thiserror::Error;

/// Errors raised while constructing, rendering, or inspecting an introspectable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectError {
    #[error("{type_name}() missing required field `{field}`")]
    MissingField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("value {value} for `{type_name}.{field}` is out of range for {target}")]
    Range {
        type_name: &'static str,
        field: &'static str,
        value: String,
        target: &'static str,
    },

    #[error("`{type_name}.{field}` expects {expected}, found {found}")]
    TypeMismatch {
        type_name: &'static str,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{type_name}' has no attribute '{attribute}'")]
    AttributeNotFound { type_name: String, attribute: String },

    #[error("invariant violated for `{type_name}`: {reason}")]
    InvariantViolation { type_name: String, reason: String },
}

impl IntrospectError {
    pub fn attribute_not_found(type_name: impl Into<String>, attribute: impl Into<String>) -> Self {
        IntrospectError::AttributeNotFound {
            type_name: type_name.into(),
            attribute: attribute.into(),
        }
    }

    pub fn invariant(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        IntrospectError::InvariantViolation {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

/// Conversion failure for a single value, before the owning field is known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("value {value} is out of range for {target}")]
    Range { value: String, target: &'static str },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl ValueError {
    /// Attach the owning type and field.
    pub fn for_field(self, type_name: &'static str, field: &'static str) -> IntrospectError {
        match self {
            ValueError::Range { value, target } => IntrospectError::Range {
                type_name,
                field,
                value,
                target,
            },
            ValueError::TypeMismatch { expected, found } => IntrospectError::TypeMismatch {
                type_name,
                field,
                expected,
                found,
            },
        }
    }
}

/// Errors raised by [`Registry`](crate::registry::Registry) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("occupancy key `{key}` is not valid in `{scope}`")]
    InvalidKey { scope: String, key: String },

    #[error("registry `{scope}` is full ({capacity} addresses)")]
    CapacityExceeded { scope: String, capacity: usize },

    #[error("registry `{scope}` lock is poisoned")]
    Poisoned { scope: String },

    #[error(
        "released address in `{released_from}` but could not claim `{key}` in `{failed_claim_to}`"
    )]
    PartialMove {
        released_from: String,
        failed_claim_to: String,
        key: String,
        #[source]
        source: Box<RegistryError>,
    },
}
