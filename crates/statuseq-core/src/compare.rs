//! # Compare Module
//!
//! The status-equivalence engine.
//!
//! Two status snapshots are equal when:
//! - both are absent, or
//! - both are present, of the same kind, and structurally equal, where the
//!   conditions key is compared as a set of normalized conditions and numbers
//!   are compared by value regardless of how they were decoded.
//!
//! Data-quality problems inside a status never abort a comparison. They
//! degrade the verdict to "not equal", which biases callers toward issuing an
//! update rather than silently skipping one.

use crate::conditions::{conditions_equal, normalize_conditions};
use crate::diff::{StatusDiff, render_diff};
use crate::primitives::{
    CONDITION_GENERATION_FIELD, CONDITION_STATUS_FIELD, CONDITION_TYPE_FIELD,
    DEFAULT_CONDITIONS_KEY, VOLATILE_CONDITION_FIELDS,
};
use crate::resource::StatusSource;
use crate::types::{StatusEqError, StatusValue};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

// =============================================================================
// OPTIONS
// =============================================================================

/// Tunable comparison behavior.
///
/// The defaults reproduce the conventional behavior: the `conditions` key is
/// a condition set, only type/status/observedGeneration are significant, and
/// a diff is rendered on inequality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareOptions {
    /// Status key compared as an unordered condition set.
    pub conditions_key: String,
    /// Extra condition attributes that are significant for equality.
    pub retained_condition_fields: Vec<String>,
    /// Render a diff when the statuses differ.
    pub render_diff: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            conditions_key: DEFAULT_CONDITIONS_KEY.to_string(),
            retained_condition_fields: Vec::new(),
            render_diff: true,
        }
    }
}

impl CompareOptions {
    /// Check the options for values the comparator cannot honor.
    pub fn validate(&self) -> Result<(), StatusEqError> {
        if self.conditions_key.is_empty() {
            return Err(StatusEqError::Config(
                "conditions_key must not be empty".to_string(),
            ));
        }

        for field in &self.retained_condition_fields {
            if field.is_empty() {
                return Err(StatusEqError::Config(
                    "retained_condition_fields must not contain empty names".to_string(),
                ));
            }
            if [
                CONDITION_TYPE_FIELD,
                CONDITION_STATUS_FIELD,
                CONDITION_GENERATION_FIELD,
            ]
            .contains(&field.as_str())
            {
                return Err(StatusEqError::Config(format!(
                    "'{}' is always compared and cannot be listed in retained_condition_fields",
                    field
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// COMPARISON RESULT
// =============================================================================

/// Verdict of a status comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Whether the two statuses are semantically equal.
    pub equal: bool,
    /// Diagnostic diff, only on inequality and only if rendering succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<StatusDiff>,
}

impl Comparison {
    /// An equal verdict.
    #[must_use]
    pub const fn equal() -> Self {
        Self {
            equal: true,
            diff: None,
        }
    }

    /// An unequal verdict with an optional diagnostic diff.
    #[must_use]
    pub const fn unequal(diff: Option<StatusDiff>) -> Self {
        Self { equal: false, diff }
    }
}

// =============================================================================
// COMPARATOR
// =============================================================================

/// The status comparator.
///
/// Holds only immutable options, so a single instance can be shared freely
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    options: CompareOptions,
}

impl Comparator {
    /// Create a comparator with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a comparator with validated options.
    pub fn with_options(options: CompareOptions) -> Result<Self, StatusEqError> {
        options.validate()?;
        for field in &options.retained_condition_fields {
            if VOLATILE_CONDITION_FIELDS.contains(&field.as_str()) {
                tracing::debug!(field = %field, "comparing a normally volatile condition field");
            }
        }
        Ok(Self { options })
    }

    /// The options in effect.
    #[must_use]
    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare the statuses of two resources.
    ///
    /// Fails only when a resource is of an unsupported kind. Every other
    /// problem yields an unequal verdict.
    pub fn compare<A, B>(&self, old: &A, new: &B) -> Result<Comparison, StatusEqError>
    where
        A: StatusSource + ?Sized,
        B: StatusSource + ?Sized,
    {
        self.evaluate(old, new, self.options.render_diff)
    }

    /// Compare the statuses of two resources, returning only the verdict.
    ///
    /// The diff is still rendered for the debug log, but only when a
    /// subscriber has `DEBUG` enabled for this module.
    pub fn status_equal<A, B>(&self, old: &A, new: &B) -> Result<bool, StatusEqError>
    where
        A: StatusSource + ?Sized,
        B: StatusSource + ?Sized,
    {
        let render = self.options.render_diff && tracing::enabled!(tracing::Level::DEBUG);
        Ok(self.evaluate(old, new, render)?.equal)
    }

    fn evaluate<A, B>(&self, old: &A, new: &B, render: bool) -> Result<Comparison, StatusEqError>
    where
        A: StatusSource + ?Sized,
        B: StatusSource + ?Sized,
    {
        let old_status = old.extract_status()?;
        let new_status = new.extract_status()?;

        let equal = match (&old_status.value, &new_status.value) {
            (Some(old_value), Some(new_value)) => {
                if old_status.kind != new_status.kind {
                    tracing::warn!(
                        old_kind = %old_status.kind,
                        new_kind = %new_status.kind,
                        "status kinds differ, treating statuses as unequal"
                    );
                    false
                } else {
                    match (old_value, new_value) {
                        (Value::Object(old_map), Value::Object(new_map)) => {
                            self.status_values_equal(old_map, new_map)
                        }
                        _ => values_equal(old_value, new_value),
                    }
                }
            }
            (None, None) => true,
            _ => false,
        };

        if equal {
            return Ok(Comparison::equal());
        }

        let diff = if render {
            try_render_diff(
                old_status.value.as_ref().unwrap_or(&Value::Null),
                new_status.value.as_ref().unwrap_or(&Value::Null),
            )
        } else {
            None
        };

        Ok(Comparison::unequal(diff))
    }

    /// Compare two status mappings field by field.
    ///
    /// The conditions key is compared as a condition set; every other key by
    /// deep value equality.
    #[must_use]
    pub fn status_values_equal(&self, old: &StatusValue, new: &StatusValue) -> bool {
        if old.len() != new.len() {
            return false;
        }

        for (key, old_value) in old {
            let Some(new_value) = new.get(key) else {
                return false;
            };

            if *key == self.options.conditions_key {
                if !self.condition_sets_equal(old_value, new_value) {
                    return false;
                }
            } else if !values_equal(old_value, new_value) {
                return false;
            }
        }

        new.keys().all(|key| old.contains_key(key))
    }

    /// Normalize both condition collections and compare them as sets.
    fn condition_sets_equal(&self, old: &Value, new: &Value) -> bool {
        let retained = &self.options.retained_condition_fields;

        let decoded = normalize_conditions(old, retained)
            .and_then(|o| normalize_conditions(new, retained).map(|n| (o, n)));

        match decoded {
            Ok((old_conditions, new_conditions)) => {
                conditions_equal(&old_conditions, &new_conditions)
            }
            Err(e) => {
                tracing::error!(
                    key = %self.options.conditions_key,
                    error = %e,
                    "failed to normalize conditions, treating statuses as unequal"
                );
                false
            }
        }
    }
}

/// Compare the statuses of two resources with default options.
pub fn status_equal<A, B>(old: &A, new: &B) -> Result<bool, StatusEqError>
where
    A: StatusSource + ?Sized,
    B: StatusSource + ?Sized,
{
    Comparator::new().status_equal(old, new)
}

/// Render a diff, logging and dropping any failure.
fn try_render_diff(old: &Value, new: &Value) -> Option<StatusDiff> {
    match render_diff(old, new) {
        Ok(diff) => {
            tracing::debug!(changes = diff.len(), "status changed:\n{}", diff);
            Some(diff)
        }
        Err(e) => {
            tracing::debug!(error = %e, "could not render status diff");
            None
        }
    }
}

// =============================================================================
// DEEP VALUE EQUALITY
// =============================================================================

/// Deep equality of two JSON-like values.
///
/// Sequences compare element-wise in order, mappings key-wise, and numbers
/// by numeric value so that `3`, `3u64` and `3.0` are all equal.
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => false,
    }
}

/// Numeric equality across integer and floating-point encodings.
#[must_use]
pub fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (as_wide_integer(a), as_wide_integer(b)) {
        (Some(x), Some(y)) => x == y,
        (Some(int), None) => b.as_f64().is_some_and(|f| float_matches(f, int)),
        (None, Some(int)) => a.as_f64().is_some_and(|f| float_matches(f, int)),
        (None, None) => a.as_f64() == b.as_f64(),
    }
}

/// Read a number as a signed 64-bit integer, accepting integral floats.
pub(crate) fn as_integer(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_f64() {
        return n.as_f64().and_then(|f| {
            let int = f as i64;
            float_matches(f, i128::from(int)).then_some(int)
        });
    }
    None
}

/// An integer-encoded number widened so that every `i64` and `u64` fits.
fn as_wide_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Whether a float holds exactly the given integer value.
fn float_matches(f: f64, int: i128) -> bool {
    f.is_finite() && f.fract() == 0.0 && f as i128 == int
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Resource;
    use serde_json::json;

    fn map(value: Value) -> StatusValue {
        match value {
            Value::Object(m) => m,
            _ => StatusValue::new(),
        }
    }

    #[test]
    fn numbers_equal_across_encodings() {
        let three_int = Number::from(3);
        let three_uint = Number::from(3u64);
        let three_float = Number::from_f64(3.0).expect("finite");
        let three_half = Number::from_f64(3.5).expect("finite");

        assert!(numbers_equal(&three_int, &three_uint));
        assert!(numbers_equal(&three_int, &three_float));
        assert!(numbers_equal(&three_float, &three_uint));
        assert!(!numbers_equal(&three_int, &three_half));
        assert!(!numbers_equal(&Number::from(-1), &Number::from(u64::MAX)));
    }

    #[test]
    fn as_integer_accepts_integral_floats_only() {
        assert_eq!(as_integer(&Number::from(7)), Some(7));
        assert_eq!(as_integer(&Number::from_f64(7.0).expect("finite")), Some(7));
        assert_eq!(as_integer(&Number::from_f64(7.25).expect("finite")), None);
        assert_eq!(as_integer(&Number::from(u64::MAX)), None);
        assert_eq!(as_integer(&Number::from_f64(1e30).expect("finite")), None);
    }

    #[test]
    fn values_equal_is_type_sensitive() {
        assert!(!values_equal(&json!("3"), &json!(3)));
        assert!(!values_equal(&json!(null), &json!(false)));
        assert!(!values_equal(&json!([]), &json!({})));
    }

    #[test]
    fn values_equal_sequences_are_ordered() {
        assert!(values_equal(&json!([1, 2]), &json!([1.0, 2])));
        assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!values_equal(&json!([1, 2]), &json!([1, 2, 3])));
    }

    #[test]
    fn values_equal_nested_mappings() {
        assert!(values_equal(
            &json!({"a": {"b": [1, {"c": true}]}}),
            &json!({"a": {"b": [1.0, {"c": true}]}})
        ));
        assert!(!values_equal(
            &json!({"a": {"b": 1}}),
            &json!({"a": {"b": 1, "c": 2}})
        ));
    }

    #[test]
    fn status_values_key_sets_must_match() {
        let comparator = Comparator::new();
        let old = map(json!({"replicas": 3, "readyReplicas": 3}));
        let new = map(json!({"replicas": 3, "updatedReplicas": 3}));
        assert!(!comparator.status_values_equal(&old, &new));
        assert!(!comparator.status_values_equal(&old, &map(json!({"replicas": 3}))));
    }

    #[test]
    fn empty_conditions_differ_from_missing_conditions() {
        let comparator = Comparator::new();
        let with_empty = map(json!({"replicas": 1, "conditions": []}));
        let without = map(json!({"replicas": 1}));
        assert!(!comparator.status_values_equal(&with_empty, &without));
        assert!(!comparator.status_values_equal(&without, &with_empty));
        assert!(comparator.status_values_equal(&with_empty, &with_empty.clone()));
    }

    #[test]
    fn malformed_conditions_degrade_to_unequal() {
        let comparator = Comparator::new();
        let status = map(json!({"conditions": "broken"}));
        assert!(!comparator.status_values_equal(&status, &status.clone()));
    }

    #[test]
    fn duplicate_condition_types_degrade_to_unequal() {
        let comparator = Comparator::new();
        let status = map(json!({"conditions": [
            {"type": "Ready", "status": "True"},
            {"type": "Ready", "status": "True"}
        ]}));
        assert!(!comparator.status_values_equal(&status, &status.clone()));
    }

    #[test]
    fn custom_conditions_key() {
        let options = CompareOptions {
            conditions_key: "checks".to_string(),
            ..CompareOptions::default()
        };
        let comparator = Comparator::with_options(options).expect("valid");
        let old = map(json!({"checks": [
            {"type": "A", "status": "True", "lastProbeTime": "t1"},
            {"type": "B", "status": "False"}
        ]}));
        let new = map(json!({"checks": [
            {"type": "B", "status": "False"},
            {"type": "A", "status": "True", "lastProbeTime": "t2"}
        ]}));
        assert!(comparator.status_values_equal(&old, &new));

        // Under the default key the same lists compare positionally and raw.
        assert!(!Comparator::new().status_values_equal(&old, &new));
    }

    #[test]
    fn retained_fields_become_significant() {
        let old = json!({"status": {"conditions": [
            {"type": "Ready", "status": "True", "reason": "Up"}
        ]}});
        let new = json!({"status": {"conditions": [
            {"type": "Ready", "status": "True", "reason": "Recovered"}
        ]}});

        assert!(status_equal(&old, &new).expect("compare"));

        let options = CompareOptions {
            retained_condition_fields: vec!["reason".to_string()],
            ..CompareOptions::default()
        };
        let comparator = Comparator::with_options(options).expect("valid");
        assert!(!comparator.status_equal(&old, &new).expect("compare"));
    }

    #[test]
    fn options_validation() {
        assert!(CompareOptions::default().validate().is_ok());

        let empty_key = CompareOptions {
            conditions_key: String::new(),
            ..CompareOptions::default()
        };
        assert!(matches!(
            Comparator::with_options(empty_key),
            Err(StatusEqError::Config(_))
        ));

        let canonical = CompareOptions {
            retained_condition_fields: vec!["status".to_string()],
            ..CompareOptions::default()
        };
        assert!(canonical.validate().is_err());

        let blank = CompareOptions {
            retained_condition_fields: vec![String::new()],
            ..CompareOptions::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: CompareOptions =
            serde_json::from_value(json!({"render_diff": false})).expect("deserialize");
        assert_eq!(options.conditions_key, "conditions");
        assert!(!options.render_diff);

        let unknown = serde_json::from_value::<CompareOptions>(json!({"bogus": 1}));
        assert!(unknown.is_err());
    }

    #[test]
    fn compare_renders_diff_on_inequality() {
        let old = json!({"status": {"replicas": 3}});
        let new = json!({"status": {"replicas": 2}});
        let comparison = Comparator::new().compare(&old, &new).expect("compare");
        assert!(!comparison.equal);
        let diff = comparison.diff.expect("diff");
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.entries()[0].path, "/replicas");
    }

    #[test]
    fn compare_skips_diff_when_disabled() {
        let options = CompareOptions {
            render_diff: false,
            ..CompareOptions::default()
        };
        let comparator = Comparator::with_options(options).expect("valid");
        let comparison = comparator
            .compare(&json!({"status": {"a": 1}}), &json!({"status": {"a": 2}}))
            .expect("compare");
        assert_eq!(comparison, Comparison::unequal(None));
    }

    #[test]
    fn status_equal_skips_diff_without_debug_logging() {
        let old = json!({"status": {"replicas": 3}});
        let new = json!({"status": {"replicas": 2}});
        let comparator = Comparator::new();

        assert!(!comparator.status_equal(&old, &new).expect("compare"));
        assert!(comparator.status_equal(&old, &old).expect("compare"));
        assert_eq!(
            comparator.evaluate(&old, &new, false).expect("compare"),
            Comparison::unequal(None)
        );
        assert!(comparator.evaluate(&old, &new, true).expect("compare").diff.is_some());
    }

    #[test]
    fn compare_equal_has_no_diff() {
        let doc = json!({"status": {"a": 1}});
        assert_eq!(
            Comparator::new().compare(&doc, &doc).expect("compare"),
            Comparison::equal()
        );
    }

    #[test]
    fn compare_kind_mismatch_is_unequal() {
        let dynamic = json!({"status": {"replicas": 1}});
        let typed = Resource::Typed(Some(map(json!({"replicas": 1}))));
        assert!(!status_equal(&dynamic, &typed).expect("compare"));
    }

    #[test]
    fn compare_opaque_statuses_by_value() {
        let running = json!({"status": "Running"});
        assert!(status_equal(&running, &running.clone()).expect("compare"));
        assert!(!status_equal(&running, &json!({"status": "Failed"})).expect("compare"));
        assert!(!status_equal(&running, &json!({"status": {}})).expect("compare"));
    }

    #[test]
    fn compare_propagates_unsupported_kind() {
        let result = status_equal(&json!(42), &json!({"status": {}}));
        assert!(matches!(result, Err(StatusEqError::UnsupportedResourceKind(_))));
    }

    #[test]
    fn compare_one_sided_absence_renders_root_diff() {
        let comparison = Comparator::new()
            .compare(&json!({}), &json!({"status": {"phase": "Bound"}}))
            .expect("compare");
        assert!(!comparison.equal);
        let diff = comparison.diff.expect("diff");
        assert_eq!(diff.entries()[0].path, "");
    }
}
