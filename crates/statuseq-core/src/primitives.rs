//! # Innate Primitives
//!
//! Hardcoded constants for the statuseq engine.
//!
//! These mirror the conventions of the orchestration API whose resources are
//! being compared. Anything a deployment may reasonably want to change lives
//! in [`crate::compare::CompareOptions`] instead.

/// Top-level key holding the status sub-structure of a dynamic resource.
pub const STATUS_KEY: &str = "status";

/// Default status key whose value is compared as an unordered condition set.
pub const DEFAULT_CONDITIONS_KEY: &str = "conditions";

/// Condition attribute carrying the logical identity of a condition.
pub const CONDITION_TYPE_FIELD: &str = "type";

/// Condition attribute carrying the tri-state condition value.
pub const CONDITION_STATUS_FIELD: &str = "status";

/// Condition attribute carrying the generation the condition was computed for.
pub const CONDITION_GENERATION_FIELD: &str = "observedGeneration";

/// Condition attributes that are known to churn on every observation cycle.
///
/// These are dropped during normalization. They are listed here for
/// diagnostics and documentation; normalization keeps an allow-list, so any
/// attribute not canonical or retained is dropped as well.
pub const VOLATILE_CONDITION_FIELDS: &[&str] = &[
    "lastUpdateTime",
    "lastTransitionTime",
    "lastHeartbeatTime",
    "lastProbeTime",
    "reason",
    "message",
];

/// Maximum nesting depth the diff renderer will descend into.
///
/// Status documents are shallow in practice; anything deeper is treated as
/// malformed input and the diagnostic is dropped.
pub const MAX_DIFF_DEPTH: usize = 64;

// =============================================================================
// TESTS
// =============================================================================
