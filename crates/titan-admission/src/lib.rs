//! Admission and status relay for TrainingJob records.
//!
//! [`AdmissionService`] turns a submission into exactly one stored record; [`QueryService`]
//! lists stored records and projects controller-written status into client views.

mod admission;
mod builder;
mod deadline;
mod identity;
mod projector;
mod query;

pub use admission::{Admission, AdmissionService, DEFAULT_MAX_ATTEMPTS};
pub use builder::JobRecordBuilder;
pub use identity::{
    RandomSuffixGenerator, DEFAULT_SUFFIX_LEN, JOB_NAME_PREFIX, MAX_SUFFIX_LEN, MIN_SUFFIX_LEN,
};
pub use projector::StatusProjector;
pub use query::QueryService;
pub use titan_types::{IdentityGenerator, JobError, JobStatusView, JobSubmission, RecordStore};
