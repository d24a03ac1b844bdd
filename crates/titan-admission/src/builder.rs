use titan_types::{JobError, JobRecord, JobSpec, JobSubmission, RecordMetadata};

/// Maps a submission onto the TrainingJob record shape shared with the controller.
#[derive(Debug, Clone)]
pub struct JobRecordBuilder {
    namespace: String,
}

impl JobRecordBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Builds a record with `spec` populated and no status. Invalid input fails with
    /// `InvalidSpec` instead of producing a malformed record.
    pub fn build(&self, identity: &str, submission: &JobSubmission) -> Result<JobRecord, JobError> {
        submission.validate()?;
        if identity.is_empty() {
            return Err(JobError::InvalidSpec("job name must not be empty".to_string()));
        }
        Ok(JobRecord::new(
            RecordMetadata {
                name: identity.to_string(),
                namespace: self.namespace.clone(),
                uid: None,
                resource_version: None,
                creation_timestamp: None,
            },
            JobSpec {
                image: submission.image.clone(),
                gpu_count: submission.gpu_count,
                priority: submission.priority,
            },
        ))
    }
}
