//! Declarative TrainingJob record as stored in the resource store.
//!
//! `spec` is written once by admission. `status` belongs to the reconciling controller: it is
//! readable here but never serialized, so no code path in this workspace can write it back.

use serde::{Deserialize, Serialize};

pub const API_GROUP: &str = "batch.rory109.com";
pub const API_VERSION: &str = "v1";
pub const KIND: &str = "TrainingJob";
pub const PLURAL: &str = "trainingjobs";

/// `apiVersion` value for TrainingJob records.
pub fn api_version() -> String {
    format!("{}/{}", API_GROUP, API_VERSION)
}

/// Object metadata (subset of Kubernetes ObjectMeta).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
}

/// Desired state of a TrainingJob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub image: String,
    #[serde(default)]
    pub gpu_count: i64,
    /// Omitted by the controller's serializer when zero.
    #[serde(default)]
    pub priority: i64,
}

/// Controller-written status, kept as the raw JSON the controller produced.
///
/// Partial or oddly shaped status is normal between creation and first reconcile, so nothing
/// here fails on content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerStatus(serde_json::Value);

impl ControllerStatus {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Convenience for `{"state": <state>}`.
    pub fn with_state(state: &str) -> Self {
        Self(serde_json::json!({ "state": state }))
    }

    /// `status.state` when present as a non-empty string.
    pub fn state(&self) -> Option<&str> {
        self.0
            .get("state")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// TrainingJob custom resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub api_version: String,
    pub kind: String,
    pub metadata: RecordMetadata,
    pub spec: JobSpec,
    #[serde(default, skip_serializing)]
    status: Option<ControllerStatus>,
}

impl JobRecord {
    /// New record with no status.
    pub fn new(metadata: RecordMetadata, spec: JobSpec) -> Self {
        Self {
            api_version: api_version(),
            kind: KIND.to_string(),
            metadata,
            spec,
            status: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn status(&self) -> Option<&ControllerStatus> {
        self.status.as_ref()
    }

    /// Record as observed after the controller wrote `status`. Used by store backends that
    /// materialize controller state; admission never calls this.
    pub fn with_controller_status(mut self, status: ControllerStatus) -> Self {
        self.status = Some(status);
        self
    }
}
