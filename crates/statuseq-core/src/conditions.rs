//! # Conditions Module
//!
//! Normalization and set comparison of status conditions.
//!
//! - Conditions are decoded into canonical [`Condition`] records
//! - Volatile attributes (timestamps, reason, message) are dropped
//! - Lists are compared as sets keyed by condition type, never by position

use crate::compare::as_integer;
use crate::primitives::{CONDITION_GENERATION_FIELD, CONDITION_STATUS_FIELD, CONDITION_TYPE_FIELD};
use crate::resource::json_type_name;
use crate::types::{Condition, ConditionStatus, StatusEqError};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Decode a raw conditions value into canonical condition records.
///
/// `retained` names extra attributes that are kept for comparison; every
/// other non-canonical attribute is discarded.
///
/// A `null` value decodes to an empty list. The output preserves input
/// order. An `observedGeneration` of zero is treated as not reported, and a
/// missing `status` reads as the empty string.
///
/// # Errors
///
/// `ConditionDecode` when the value is not a sequence, an entry is not a
/// mapping, `type` is missing or empty, `status` is not a string,
/// `observedGeneration` is not an integer, or two entries share a `type`.
pub fn normalize_conditions(
    raw: &Value,
    retained: &[String],
) -> Result<Vec<Condition>, StatusEqError> {
    let entries = match raw {
        Value::Null => return Ok(Vec::new()),
        Value::Array(entries) => entries,
        other => {
            return Err(StatusEqError::ConditionDecode(format!(
                "expected a sequence of conditions, got {}",
                json_type_name(other)
            )));
        }
    };

    let mut seen = BTreeSet::new();
    let mut conditions = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let condition = decode_condition(index, entry, retained)?;
        if !seen.insert(condition.condition_type.clone()) {
            return Err(StatusEqError::ConditionDecode(format!(
                "duplicate condition type '{}' at index {}",
                condition.condition_type, index
            )));
        }
        conditions.push(condition);
    }

    Ok(conditions)
}

/// Decode a single condition entry.
fn decode_condition(
    index: usize,
    entry: &Value,
    retained: &[String],
) -> Result<Condition, StatusEqError> {
    let fields = entry.as_object().ok_or_else(|| {
        StatusEqError::ConditionDecode(format!(
            "condition at index {} must be a mapping, got {}",
            index,
            json_type_name(entry)
        ))
    })?;

    let condition_type = match fields.get(CONDITION_TYPE_FIELD) {
        Some(Value::String(t)) if !t.is_empty() => t.clone(),
        Some(Value::String(_)) | None => {
            return Err(StatusEqError::ConditionDecode(format!(
                "condition at index {} has no type",
                index
            )));
        }
        Some(other) => {
            return Err(StatusEqError::ConditionDecode(format!(
                "condition at index {} has a {} type, expected string",
                index,
                json_type_name(other)
            )));
        }
    };

    let status = match fields.get(CONDITION_STATUS_FIELD) {
        Some(Value::String(raw)) => ConditionStatus::parse(raw),
        None | Some(Value::Null) => ConditionStatus::parse(""),
        Some(other) => {
            return Err(StatusEqError::ConditionDecode(format!(
                "condition '{}' has a {} status, expected string",
                condition_type,
                json_type_name(other)
            )));
        }
    };

    if !status.is_conventional() {
        tracing::debug!(
            condition = %condition_type,
            status = %status,
            "condition status outside True/False/Unknown, comparing verbatim"
        );
    }

    let observed_generation = match fields.get(CONDITION_GENERATION_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match as_integer(n) {
            Some(0) => None,
            Some(generation) => Some(generation),
            None => {
                return Err(StatusEqError::ConditionDecode(format!(
                    "condition '{}' has non-integer observedGeneration {}",
                    condition_type, n
                )));
            }
        },
        Some(other) => {
            return Err(StatusEqError::ConditionDecode(format!(
                "condition '{}' has a {} observedGeneration, expected integer",
                condition_type,
                json_type_name(other)
            )));
        }
    };

    let retained = retained
        .iter()
        .filter_map(|key| match fields.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some((key.clone(), value.clone())),
        })
        .collect::<BTreeMap<_, _>>();

    Ok(Condition {
        condition_type,
        status,
        observed_generation,
        retained,
    })
}

// =============================================================================
// SET COMPARISON
// =============================================================================

/// Compare two normalized condition lists as sets keyed by type.
///
/// Lists of different length are unequal. Otherwise every condition in
/// `new` must find a condition of the same type in `old` with the same
/// value. With equal lengths and unique types per list, this one-way check
/// establishes set equality in both directions.
#[must_use]
pub fn conditions_equal(old: &[Condition], new: &[Condition]) -> bool {
    if old.len() != new.len() {
        return false;
    }

    let by_type: BTreeMap<&str, &Condition> = old
        .iter()
        .map(|c| (c.condition_type.as_str(), c))
        .collect();

    new.iter().all(|c| {
        by_type
            .get(c.condition_type.as_str())
            .is_some_and(|previous| previous.same_value(c))
    })
}

// =============================================================================
// TESTS
// =============================================================================
