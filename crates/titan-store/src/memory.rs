//! In-memory record store (process lifetime only).

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use titan_types::{ControllerStatus, JobRecord, RecordStore, RecordStoreError};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory RecordStore for one namespace: atomic create-if-absent, list in creation order.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    namespace: String,
    records: Arc<RwLock<Vec<JobRecord>>>,
    resource_version: Arc<AtomicU64>,
}

impl InMemoryRecordStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            records: Arc::new(RwLock::new(Vec::new())),
            resource_version: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Stands in for the reconciling controller: replaces the status of the named record.
    /// Returns false when no such record exists.
    pub async fn apply_status(&self, name: &str, status: ControllerStatus) -> bool {
        let mut guard = self.records.write().await;
        let Some(slot) = guard.iter_mut().find(|r| r.name() == name) else {
            return false;
        };
        let mut updated = slot.clone().with_controller_status(status);
        updated.metadata.resource_version = Some(self.next_version());
        *slot = updated;
        true
    }

    fn next_version(&self) -> String {
        self.resource_version
            .fetch_add(1, Ordering::Relaxed)
            .to_string()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, record: &JobRecord) -> Result<JobRecord, RecordStoreError> {
        if record.metadata.namespace != self.namespace {
            return Err(RecordStoreError::Rejected(format!(
                "record namespace {} does not match store namespace {}",
                record.metadata.namespace, self.namespace
            )));
        }
        let mut guard = self.records.write().await;
        if guard.iter().any(|r| r.name() == record.name()) {
            return Err(RecordStoreError::AlreadyExists(record.name().to_string()));
        }
        let mut stored = JobRecord::new(record.metadata.clone(), record.spec.clone());
        stored.metadata.uid = Some(Uuid::new_v4().to_string());
        stored.metadata.resource_version = Some(self.next_version());
        stored.metadata.creation_timestamp =
            Some(Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());
        guard.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<JobRecord>, RecordStoreError> {
        Ok(self.records.read().await.clone())
    }
}
