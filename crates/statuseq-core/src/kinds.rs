//! # Typed Kinds
//!
//! Fixed-schema records for the resource kinds statuseq understands natively.
//!
//! Field names and omission rules follow the orchestration API's wire format
//! (camelCase, zero values omitted), so a typed resource and the dynamic
//! document it was decoded from flatten to the same status mapping.

use crate::resource::{Resource, TypedResource};
use crate::types::StatusEqError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

// =============================================================================
// METADATA
// =============================================================================

/// The subset of object metadata statuseq reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub generation: i64,
}

// =============================================================================
// DEPLOYMENT (apps/v1)
// =============================================================================

/// An apps/v1 Deployment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deployment {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: DeploymentSpec,
    pub status: DeploymentStatus,
}

/// Desired state of a Deployment. Only the replica count is modelled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}

/// Observed state of a Deployment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentStatus {
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub observed_generation: i64,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub replicas: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub updated_replicas: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub ready_replicas: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub available_replicas: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub unavailable_replicas: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<DeploymentCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collision_count: Option<i32>,
}

/// A Deployment condition as reported on the wire, volatile fields included.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl TypedResource for Deployment {
    type Status = DeploymentStatus;

    fn status(&self) -> Option<&DeploymentStatus> {
        Some(&self.status)
    }
}

// =============================================================================
// CONFIGMAP (v1)
// =============================================================================

/// A v1 ConfigMap. Carries no status field at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigMap {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub data: BTreeMap<String, String>,
}

impl TypedResource for ConfigMap {
    type Status = ();

    fn status(&self) -> Option<&()> {
        None
    }
}

// =============================================================================
// KIND REGISTRY
// =============================================================================

/// The typed kinds that can be decoded from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedKind {
    Deployment,
    ConfigMap,
}

impl TypedKind {
    /// Identify the typed kind of a document from its `apiVersion` and `kind`.
    #[must_use]
    pub fn detect(document: &Value) -> Option<Self> {
        let api_version = document.get("apiVersion").and_then(Value::as_str)?;
        let kind = document.get("kind").and_then(Value::as_str)?;
        match (api_version, kind) {
            ("apps/v1", "Deployment") => Some(Self::Deployment),
            ("v1", "ConfigMap") => Some(Self::ConfigMap),
            _ => None,
        }
    }

    /// Decode a document into its typed form and flatten it into a [`Resource`].
    ///
    /// Fails with `UnsupportedResourceKind` for documents of any other kind.
    pub fn decode(document: Value) -> Result<Resource, StatusEqError> {
        let Some(kind) = Self::detect(&document) else {
            return Err(StatusEqError::UnsupportedResourceKind(format!(
                "no typed representation for apiVersion={} kind={}",
                document
                    .get("apiVersion")
                    .and_then(Value::as_str)
                    .unwrap_or("<none>"),
                document
                    .get("kind")
                    .and_then(Value::as_str)
                    .unwrap_or("<none>")
            )));
        };

        match kind {
            Self::Deployment => {
                let deployment: Deployment = serde_json::from_value(document)
                    .map_err(|e| StatusEqError::SerializationError(e.to_string()))?;
                Resource::typed(&deployment)
            }
            Self::ConfigMap => {
                let config_map: ConfigMap = serde_json::from_value(document)
                    .map_err(|e| StatusEqError::SerializationError(e.to_string()))?;
                Resource::typed(&config_map)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
