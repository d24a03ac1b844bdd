//! Submission protocol: validate, name, build, create; regenerate the name on collision.

use crate::deadline::with_deadline;
use crate::JobRecordBuilder;
use std::sync::Arc;
use std::time::Duration;
use titan_types::{
    IdentityGenerator, JobError, JobSubmission, RecordStore, RecordStoreError, SubmitResponse,
    ACCEPTED_STATE,
};

/// Bound on create attempts per submission (first try plus collision retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Result of a successful submission.
///
/// `accepted_state` is a local label meaning "stored", not a read of controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub name: String,
    pub accepted_state: &'static str,
}

impl From<Admission> for SubmitResponse {
    fn from(a: Admission) -> Self {
        SubmitResponse {
            message: "Job submitted successfully".to_string(),
            name: a.name,
            status: a.accepted_state.to_string(),
        }
    }
}

/// Admits each submission as exactly one durable record.
///
/// Holds no locks and no job registry; concurrent name collisions are resolved by the store's
/// create-if-absent semantics.
pub struct AdmissionService {
    store: Arc<dyn RecordStore + Send + Sync>,
    identities: Arc<dyn IdentityGenerator + Send + Sync>,
    builder: JobRecordBuilder,
    max_attempts: u32,
    store_timeout: Option<Duration>,
}

impl AdmissionService {
    pub fn new(
        store: Arc<dyn RecordStore + Send + Sync>,
        identities: Arc<dyn IdentityGenerator + Send + Sync>,
        builder: JobRecordBuilder,
    ) -> Self {
        Self {
            store,
            identities,
            builder,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            store_timeout: None,
        }
    }

    /// At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_store_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub async fn submit(&self, submission: &JobSubmission) -> Result<Admission, JobError> {
        submission.validate()?;

        for attempt in 1..=self.max_attempts {
            let name = self.identities.generate();
            let record = self.builder.build(&name, submission)?;
            match with_deadline(self.store_timeout, self.store.create(&record)).await {
                Ok(_) => {
                    tracing::info!(
                        name = %name,
                        namespace = %self.builder.namespace(),
                        image = %submission.image,
                        gpu_count = submission.gpu_count,
                        priority = submission.priority,
                        attempt,
                        "training job admitted"
                    );
                    return Ok(Admission {
                        name,
                        accepted_state: ACCEPTED_STATE,
                    });
                }
                Err(RecordStoreError::AlreadyExists(_)) => {
                    tracing::warn!(name = %name, attempt, "job name already taken, regenerating");
                }
                Err(e @ RecordStoreError::Rejected(_)) => {
                    tracing::error!(name = %name, error = %e, "store rejected job record");
                    return Err(JobError::StoreRejected(e));
                }
                Err(e) => {
                    tracing::error!(name = %name, error = %e, "store unavailable during admission");
                    return Err(JobError::StoreUnavailable(e));
                }
            }
        }

        tracing::error!(attempts = self.max_attempts, "job name collisions exhausted retries");
        Err(JobError::AdmissionExhausted {
            attempts: self.max_attempts,
        })
    }
}
