//! # Diff Module
//!
//! Structural diff of two status values, for diagnostics only.
//!
//! Entries are addressed by JSON pointer (`/conditions/1/status`) and
//! emitted in a deterministic order: mapping keys sorted, sequence elements
//! by index. The diff never influences the equality verdict.

use crate::compare::values_equal;
use crate::primitives::MAX_DIFF_DEPTH;
use crate::types::StatusEqError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// DIFF MODEL
// =============================================================================

/// A single change between two values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DiffOp {
    /// Present only in the new value.
    Added { value: Value },
    /// Present only in the old value.
    Removed { value: Value },
    /// Present in both with different content.
    Changed { from: Value, to: Value },
}

/// A change located by JSON pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// JSON pointer to the changed location; empty for the root.
    pub path: String,
    #[serde(flatten)]
    pub op: DiffOp,
}

/// Ordered list of changes between two status values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusDiff {
    entries: Vec<DiffEntry>,
}

impl StatusDiff {
    /// The changes, in deterministic order.
    #[must_use]
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// Number of changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for StatusDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let path = if entry.path.is_empty() {
                "/"
            } else {
                entry.path.as_str()
            };
            match &entry.op {
                DiffOp::Added { value } => write!(f, "+ {}: {}", path, value)?,
                DiffOp::Removed { value } => write!(f, "- {}: {}", path, value)?,
                DiffOp::Changed { from, to } => write!(f, "~ {}: {} -> {}", path, from, to)?,
            }
        }
        Ok(())
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Compute the structural diff between two values.
///
/// Fails with `DiffRender` when nesting exceeds [`MAX_DIFF_DEPTH`].
pub fn render_diff(old: &Value, new: &Value) -> Result<StatusDiff, StatusEqError> {
    let mut entries = Vec::new();
    walk(String::new(), old, new, 0, &mut entries)?;
    Ok(StatusDiff { entries })
}

fn walk(
    path: String,
    old: &Value,
    new: &Value,
    depth: usize,
    entries: &mut Vec<DiffEntry>,
) -> Result<(), StatusEqError> {
    if depth > MAX_DIFF_DEPTH {
        return Err(StatusEqError::DiffRender(format!(
            "nesting exceeds {} levels at '{}'",
            MAX_DIFF_DEPTH, path
        )));
    }

    match (old, new) {
        (Value::Object(a), Value::Object(b)) => {
            let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
            for key in keys {
                let child = format!("{}/{}", path, escape_pointer_token(key));
                match (a.get(key), b.get(key)) {
                    (Some(x), Some(y)) => walk(child, x, y, depth + 1, entries)?,
                    (Some(x), None) => entries.push(DiffEntry {
                        path: child,
                        op: DiffOp::Removed { value: x.clone() },
                    }),
                    (None, Some(y)) => entries.push(DiffEntry {
                        path: child,
                        op: DiffOp::Added { value: y.clone() },
                    }),
                    (None, None) => {}
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for index in 0..a.len().max(b.len()) {
                let child = format!("{}/{}", path, index);
                match (a.get(index), b.get(index)) {
                    (Some(x), Some(y)) => walk(child, x, y, depth + 1, entries)?,
                    (Some(x), None) => entries.push(DiffEntry {
                        path: child,
                        op: DiffOp::Removed { value: x.clone() },
                    }),
                    (None, Some(y)) => entries.push(DiffEntry {
                        path: child,
                        op: DiffOp::Added { value: y.clone() },
                    }),
                    (None, None) => {}
                }
            }
        }
        _ if values_equal(old, new) => {}
        _ => entries.push(DiffEntry {
            path,
            op: DiffOp::Changed {
                from: old.clone(),
                to: new.clone(),
            },
        }),
    }

    Ok(())
}

/// Escape a mapping key for use as a JSON pointer token.
fn escape_pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

// =============================================================================
// TESTS
// =============================================================================
