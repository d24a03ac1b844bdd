//! Listing: all records of the store's namespace, projected in store order.

use crate::deadline::with_deadline;
use crate::StatusProjector;
use std::sync::Arc;
use std::time::Duration;
use titan_types::{JobError, JobStatusView, RecordStore};

pub struct QueryService {
    store: Arc<dyn RecordStore + Send + Sync>,
    projector: StatusProjector,
    store_timeout: Option<Duration>,
}

impl QueryService {
    pub fn new(store: Arc<dyn RecordStore + Send + Sync>) -> Self {
        Self {
            store,
            projector: StatusProjector,
            store_timeout: None,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// All-or-nothing: any store failure, including a timeout, is `StoreUnavailable` and no
    /// partial list is returned. An empty store yields an empty list.
    pub async fn list(&self) -> Result<Vec<JobStatusView>, JobError> {
        let records = with_deadline(self.store_timeout, self.store.list())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "listing training jobs failed");
                JobError::StoreUnavailable(e)
            })?;
        tracing::debug!(count = records.len(), "listed training jobs");
        Ok(records.iter().map(|r| self.projector.project(r)).collect())
    }
}
