//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use statuseq_core::{Comparison, StatusDiff};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// COMPARE REQUEST/RESPONSE
// =============================================================================

/// Status comparison request.
///
/// `old` and `new` are full resource documents. With `typed`, both are
/// decoded into their fixed-schema records before comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    pub old: Value,
    pub new: Value,
    #[serde(default)]
    pub typed: bool,
}

/// Status comparison response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<StatusDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompareResponse {
    /// Create a response carrying a verdict.
    #[must_use]
    pub fn verdict(comparison: Comparison) -> Self {
        Self {
            success: true,
            equal: Some(comparison.equal),
            diff: comparison.diff,
            error: None,
        }
    }

    /// Create an error response.
    #[must_use]
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            equal: None,
            diff: None,
            error: Some(msg.into()),
        }
    }
}
