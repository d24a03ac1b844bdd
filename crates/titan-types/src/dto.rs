//! Request and response DTOs for the `/jobs` API.

use crate::JobError;
use serde::{Deserialize, Serialize};

/// Label returned on successful admission. Reflects acceptance into the store, not scheduling.
pub const ACCEPTED_STATE: &str = "Queued/Pending";

/// Status reported for a record the controller has not reconciled yet.
pub const UNKNOWN_STATE: &str = "Unknown";

/// Submit-job request (POST /jobs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSubmission {
    pub image: String,
    #[serde(rename = "gpuCount", alias = "gpu_count")]
    pub gpu_count: i64,
    pub priority: i64,
}

impl JobSubmission {
    pub fn new(image: impl Into<String>, gpu_count: i64, priority: i64) -> Self {
        Self {
            image: image.into(),
            gpu_count,
            priority,
        }
    }

    /// Checks field values. Priority is passed through unchecked.
    pub fn validate(&self) -> Result<(), JobError> {
        if self.image.trim().is_empty() {
            return Err(JobError::InvalidSpec("image must not be empty".to_string()));
        }
        if self.gpu_count < 0 {
            return Err(JobError::InvalidSpec(format!(
                "gpuCount must be non-negative, got {}",
                self.gpu_count
            )));
        }
        Ok(())
    }
}

/// Successful submit response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    pub name: String,
    pub status: String,
}

/// One entry of the GET /jobs listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusView {
    pub name: String,
    pub status: String,
    pub image: String,
}

/// Error body returned by both endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub message: String,
}

impl From<&JobError> for ErrorResponse {
    fn from(err: &JobError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}
