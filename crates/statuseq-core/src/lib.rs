//! # statuseq-core
//!
//! The status-equivalence engine for statuseq - THE ENGINE.
//!
//! Given two snapshots of a resource's status, one taken before an operation
//! and one after, decide whether they are semantically equal so that a
//! controller can skip a redundant status update.
//!
//! ## Pipeline
//!
//! ```text
//! Resource ──extract──► status + presence ──► structural compare ──► verdict
//!                                                │                     │
//!                                     conditions │                     │ unequal
//!                                                ▼                     ▼
//!                                   normalize + set compare       render diff
//! ```
//!
//! ## Architectural Constraints
//!
//! - Pure and synchronous: no I/O, no locks, no global state
//! - Data-quality problems degrade to "not equal", never to an error
//! - Only misuse (an unsupported resource kind) is reported as an error

// =============================================================================
// MODULES
// =============================================================================

pub mod compare;
pub mod conditions;
pub mod diff;
pub mod kinds;
pub mod primitives;
pub mod resource;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{Condition, ConditionStatus, StatusEqError, StatusKind, StatusValue};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use compare::{
    CompareOptions, Comparator, Comparison, numbers_equal, status_equal, values_equal,
};
pub use conditions::{conditions_equal, normalize_conditions};
pub use diff::{DiffEntry, DiffOp, StatusDiff, render_diff};
pub use resource::{ExtractedStatus, Resource, StatusSource, TypedResource};

// =============================================================================
// RE-EXPORTS: Typed Kinds
// =============================================================================

pub use kinds::{
    ConfigMap, Deployment, DeploymentCondition, DeploymentSpec, DeploymentStatus, ObjectMeta,
    TypedKind,
};
