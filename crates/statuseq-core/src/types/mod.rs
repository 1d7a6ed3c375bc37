//! # Core Type Definitions
//!
//! This module contains the core types shared by every stage of the engine:
//! - Status shapes (`StatusValue`, `StatusKind`)
//! - Canonical condition records (`Condition`, `ConditionStatus`)
//! - Error types (`StatusEqError`)
//!
//! ## Determinism Guarantees
//!
//! Retained condition attributes are held in a `BTreeMap` so that debug
//! output and comparisons never depend on insertion order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// STATUS SHAPES
// =============================================================================

/// The canonical status shape: a mapping from field name to JSON-like value.
///
/// Dynamic resources carry it directly; typed resources are serialized into
/// it at the boundary so that one comparator handles both.
pub type StatusValue = serde_json::Map<String, serde_json::Value>;

/// Where an extracted status came from.
///
/// Two statuses are only comparable when their kinds match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Status mapping taken from a dynamic (untyped) document.
    Mapping,
    /// Status record taken from a typed resource and flattened to a mapping.
    Record,
    /// A dynamic document whose status key holds something other than a mapping.
    Opaque,
}

impl StatusKind {
    /// Human-readable name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mapping => "mapping",
            Self::Record => "record",
            Self::Opaque => "opaque",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// CONDITIONS
// =============================================================================

/// Value of a condition.
///
/// The orchestration API defines the `True`/`False`/`Unknown` domain, but
/// the field is a plain string on the wire. Anything else is carried
/// verbatim in `Other` and compared by exact text, so a missing status and
/// an empty one are the same value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
    Other(String),
}

impl ConditionStatus {
    /// Read the wire representation. Never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "True" => Self::True,
            "False" => Self::False,
            "Unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the value lies in the conventional tri-state domain.
    #[must_use]
    pub const fn is_conventional(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for ConditionStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ConditionStatus> for String {
    fn from(status: ConditionStatus) -> Self {
        match status {
            ConditionStatus::Other(raw) => raw,
            conventional => conventional.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition reduced to the attributes that matter for equality.
///
/// Timestamps, reason and message are dropped during normalization.
/// `retained` holds any extra attributes the caller explicitly asked to
/// compare; it is empty under the default options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Logical identity of the condition, unique within one list.
    #[serde(rename = "type")]
    pub condition_type: String,
    /// Current value of the condition.
    pub status: ConditionStatus,
    /// Generation the condition was computed for, when reported.
    #[serde(
        rename = "observedGeneration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub observed_generation: Option<i64>,
    /// Extra attributes kept for comparison by configuration.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub retained: BTreeMap<String, serde_json::Value>,
}

impl Condition {
    /// Create a condition with no observed generation.
    #[must_use]
    pub fn new(condition_type: impl Into<String>, status: ConditionStatus) -> Self {
        Self {
            condition_type: condition_type.into(),
            status,
            observed_generation: None,
            retained: BTreeMap::new(),
        }
    }

    /// Builder: set the observed generation.
    #[must_use]
    pub fn with_generation(mut self, generation: i64) -> Self {
        self.observed_generation = Some(generation);
        self
    }

    /// Builder: retain an extra attribute for comparison.
    #[must_use]
    pub fn with_retained(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.retained.insert(key.into(), value);
        self
    }

    /// Whether two conditions with the same identity carry the same value.
    #[must_use]
    pub fn same_value(&self, other: &Self) -> bool {
        self.status == other.status
            && self.observed_generation == other.observed_generation
            && self.retained == other.retained
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in statuseq.
///
/// Only `UnsupportedResourceKind` ever escapes a comparison. Decode and diff
/// failures are absorbed by the comparator and turn into a "not equal"
/// verdict or a missing diagnostic respectively.
#[derive(Debug, Error)]
pub enum StatusEqError {
    /// The input is neither a dynamic document nor a typed record with a
    /// mapping-shaped status.
    #[error("Unsupported resource kind: {0}")]
    UnsupportedResourceKind(String),

    /// A conditions collection could not be normalized.
    #[error("Condition decode error: {0}")]
    ConditionDecode(String),

    /// The diagnostic diff could not be rendered.
    #[error("Diff render error: {0}")]
    DiffRender(String),

    /// A configuration value is invalid or the configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_status_round_trips_wire_names() {
        for status in [
            ConditionStatus::True,
            ConditionStatus::False,
            ConditionStatus::Unknown,
        ] {
            assert!(status.is_conventional());
            assert_eq!(ConditionStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn unconventional_status_is_kept_verbatim() {
        let lower = ConditionStatus::parse("true");
        assert_eq!(lower, ConditionStatus::Other("true".to_string()));
        assert!(!lower.is_conventional());
        assert_ne!(lower, ConditionStatus::True);
        assert_eq!(lower.as_str(), "true");
        assert_eq!(ConditionStatus::parse(""), ConditionStatus::Other(String::new()));
    }

    #[test]
    fn condition_status_serializes_as_plain_string() {
        let json = serde_json::to_value(ConditionStatus::parse("Degraded")).expect("serialize");
        assert_eq!(json, serde_json::json!("Degraded"));
        let back: ConditionStatus = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, ConditionStatus::Other("Degraded".to_string()));
    }

    #[test]
    fn same_value_ignores_identity() {
        let a = Condition::new("Available", ConditionStatus::True).with_generation(2);
        let b = Condition::new("Progressing", ConditionStatus::True).with_generation(2);
        assert!(a.same_value(&b));
    }

    #[test]
    fn same_value_sees_generation_and_retained() {
        let base = Condition::new("Available", ConditionStatus::True);
        assert!(!base.same_value(&base.clone().with_generation(1)));
        assert!(!base.same_value(
            &base
                .clone()
                .with_retained("reason", serde_json::json!("MinimumReplicasAvailable"))
        ));
    }

    #[test]
    fn condition_serializes_with_wire_names() {
        let condition = Condition::new("Ready", ConditionStatus::Unknown).with_generation(7);
        let json = serde_json::to_value(&condition).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"type": "Ready", "status": "Unknown", "observedGeneration": 7})
        );
    }

    #[test]
    fn status_kind_display() {
        assert_eq!(StatusKind::Record.to_string(), "record");
        assert_eq!(StatusKind::Opaque.name(), "opaque");
    }
}
