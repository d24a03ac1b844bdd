//! Traits for the record store and identity generation, plus the error taxonomy.

use crate::JobRecord;
use async_trait::async_trait;

/// Declarative resource store holding TrainingJob records.
///
/// A handle is bound to one namespace and resource type at construction.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create the record if no record with the same name exists.
    ///
    /// Must fail with [`RecordStoreError::AlreadyExists`] on a name collision and must not leave
    /// a partial record behind on any failure.
    async fn create(&self, record: &JobRecord) -> Result<JobRecord, RecordStoreError>;

    /// All current records, each possibly carrying controller-written status.
    async fn list(&self) -> Result<Vec<JobRecord>, RecordStoreError>;
}

/// Source of job names. Must not block.
pub trait IdentityGenerator: Send + Sync {
    fn generate(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error("record already exists: {0}")]
    AlreadyExists(String),
    #[error("store unreachable: {0}")]
    Unavailable(String),
    #[error("request rejected by store: {0}")]
    Rejected(String),
}

/// Caller-facing failure of a submit or list call.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Malformed or out-of-range submission. Not retried.
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    /// Every generated name collided. The whole submission may be retried.
    #[error("admission exhausted after {attempts} attempts: every generated job name was taken")]
    AdmissionExhausted { attempts: u32 },
    /// Connectivity failure or timeout. Retry with backoff.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] RecordStoreError),
    /// Permission, quota or policy denial. Not retried.
    #[error("store rejected request: {0}")]
    StoreRejected(#[source] RecordStoreError),
}

impl JobError {
    /// Stable error kind for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::InvalidSpec(_) => "InvalidSpec",
            JobError::AdmissionExhausted { .. } => "AdmissionExhausted",
            JobError::StoreUnavailable(_) => "StoreUnavailable",
            JobError::StoreRejected(_) => "StoreRejected",
        }
    }
}
