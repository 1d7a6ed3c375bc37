//! # Resource Module
//!
//! Resource representations and status extraction.
//!
//! A resource reaches the engine in one of two shapes:
//! - **Dynamic**: an untyped document (decoded JSON or YAML) whose status
//!   lives under the top-level `status` key.
//! - **Typed**: a fixed-schema record implementing [`TypedResource`]. Its
//!   status is serialized into the canonical mapping shape when the
//!   [`Resource`] is built, so the comparator never inspects Rust types.
//!
//! Every input the comparator accepts implements [`StatusSource`], the single
//! capability the engine needs: "give me the status and tell me whether it
//! is present".

use crate::primitives::STATUS_KEY;
use crate::types::{StatusEqError, StatusKind, StatusValue};
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// EXTRACTED STATUS
// =============================================================================

/// The result of status extraction.
///
/// `value` is `None` when the resource carries no status at all. A present
/// but empty status is `Some` and compares as present.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedStatus {
    /// Shape of the resource the status came from.
    pub kind: StatusKind,
    /// The status value, if present.
    pub value: Option<Value>,
}

impl ExtractedStatus {
    /// A status that is structurally absent.
    #[must_use]
    pub const fn absent(kind: StatusKind) -> Self {
        Self { kind, value: None }
    }

    /// Whether the resource carried a status.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

// =============================================================================
// STATUS SOURCE
// =============================================================================

/// Anything a status can be extracted from.
///
/// Extraction is read-only. It fails only with
/// [`StatusEqError::UnsupportedResourceKind`], which indicates the caller
/// passed something that is not a resource.
pub trait StatusSource {
    /// Extract the status sub-value and its presence.
    fn extract_status(&self) -> Result<ExtractedStatus, StatusEqError>;
}

/// A fixed-schema resource with an optional status record.
///
/// Types that declare a status field return `Some` unconditionally, even
/// when every field of the status is at its zero value. Types without a
/// status field return `None`.
pub trait TypedResource {
    /// The status record, serialized with its wire field names.
    type Status: Serialize;

    /// The status record, if this resource type declares one.
    fn status(&self) -> Option<&Self::Status>;
}

// =============================================================================
// RESOURCE
// =============================================================================

/// A resource in one of the two supported representations.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// An untyped document, e.g. the body returned by a dynamic client.
    Dynamic(serde_json::Map<String, Value>),
    /// A typed resource whose status has been flattened to a mapping.
    /// `None` when the resource type has no status field.
    Typed(Option<StatusValue>),
}

impl Resource {
    /// Wrap a decoded document.
    ///
    /// Fails with `UnsupportedResourceKind` unless the document is an object.
    pub fn from_value(document: Value) -> Result<Self, StatusEqError> {
        match document {
            Value::Object(map) => Ok(Self::Dynamic(map)),
            other => Err(StatusEqError::UnsupportedResourceKind(format!(
                "expected a resource document object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Flatten a typed resource into the canonical representation.
    ///
    /// Fails with `UnsupportedResourceKind` if the status record does not
    /// serialize to a mapping.
    pub fn typed<T: TypedResource>(resource: &T) -> Result<Self, StatusEqError> {
        let Some(status) = resource.status() else {
            return Ok(Self::Typed(None));
        };

        let value = serde_json::to_value(status)
            .map_err(|e| StatusEqError::SerializationError(e.to_string()))?;

        match value {
            Value::Object(map) => Ok(Self::Typed(Some(map))),
            other => Err(StatusEqError::UnsupportedResourceKind(format!(
                "typed status must serialize to a mapping, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// The status kind this resource produces when its status is a mapping.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        match self {
            Self::Dynamic(_) => StatusKind::Mapping,
            Self::Typed(_) => StatusKind::Record,
        }
    }
}

impl StatusSource for Resource {
    fn extract_status(&self) -> Result<ExtractedStatus, StatusEqError> {
        match self {
            Self::Dynamic(document) => Ok(extract_from_document(document)),
            Self::Typed(status) => Ok(ExtractedStatus {
                kind: StatusKind::Record,
                value: status.clone().map(Value::Object),
            }),
        }
    }
}

impl StatusSource for serde_json::Map<String, Value> {
    fn extract_status(&self) -> Result<ExtractedStatus, StatusEqError> {
        Ok(extract_from_document(self))
    }
}

impl StatusSource for Value {
    fn extract_status(&self) -> Result<ExtractedStatus, StatusEqError> {
        match self {
            Value::Object(document) => Ok(extract_from_document(document)),
            other => Err(StatusEqError::UnsupportedResourceKind(format!(
                "expected a resource document object, got {}",
                json_type_name(other)
            ))),
        }
    }
}

impl<S: StatusSource + ?Sized> StatusSource for &S {
    fn extract_status(&self) -> Result<ExtractedStatus, StatusEqError> {
        (**self).extract_status()
    }
}

/// Look up the top-level status key of a dynamic document.
fn extract_from_document(document: &serde_json::Map<String, Value>) -> ExtractedStatus {
    match document.get(STATUS_KEY) {
        None => ExtractedStatus::absent(StatusKind::Mapping),
        Some(value @ Value::Object(_)) => ExtractedStatus {
            kind: StatusKind::Mapping,
            value: Some(value.clone()),
        },
        Some(other) => ExtractedStatus {
            kind: StatusKind::Opaque,
            value: Some(other.clone()),
        },
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

// =============================================================================
// TESTS
// =============================================================================
