//! Mock store for tests: in-memory backend with call counting and scripted faults.

use crate::InMemoryRecordStore;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use titan_types::{JobRecord, RecordStore, RecordStoreError};

/// Outcome injected in place of (or ahead of) the next store call.
#[derive(Debug, Clone)]
pub enum Fault {
    /// Report a name collision without storing anything.
    AlreadyExists,
    Unavailable(String),
    Rejected(String),
    /// Sleep, then run the call normally.
    Delay(Duration),
}

/// Wraps an [`InMemoryRecordStore`]; each call consumes at most one queued fault.
pub struct MockRecordStore {
    inner: InMemoryRecordStore,
    create_calls: AtomicUsize,
    list_calls: AtomicUsize,
    create_faults: Mutex<VecDeque<Fault>>,
    list_faults: Mutex<VecDeque<Fault>>,
}

impl MockRecordStore {
    pub fn new(namespace: &str) -> Self {
        Self::wrap(InMemoryRecordStore::new(namespace))
    }

    pub fn wrap(inner: InMemoryRecordStore) -> Self {
        Self {
            inner,
            create_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            create_faults: Mutex::new(VecDeque::new()),
            list_faults: Mutex::new(VecDeque::new()),
        }
    }

    pub fn inner(&self) -> &InMemoryRecordStore {
        &self.inner
    }

    pub fn fail_next_create(&self, fault: Fault) {
        if let Ok(mut q) = self.create_faults.lock() {
            q.push_back(fault);
        }
    }

    pub fn fail_next_list(&self, fault: Fault) {
        if let Ok(mut q) = self.list_faults.lock() {
            q.push_back(fault);
        }
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn pop(queue: &Mutex<VecDeque<Fault>>) -> Option<Fault> {
        queue.lock().ok().and_then(|mut q| q.pop_front())
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn create(&self, record: &JobRecord) -> Result<JobRecord, RecordStoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        match Self::pop(&self.create_faults) {
            Some(Fault::AlreadyExists) => {
                return Err(RecordStoreError::AlreadyExists(record.name().to_string()))
            }
            Some(Fault::Unavailable(msg)) => return Err(RecordStoreError::Unavailable(msg)),
            Some(Fault::Rejected(msg)) => return Err(RecordStoreError::Rejected(msg)),
            Some(Fault::Delay(d)) => tokio::time::sleep(d).await,
            None => {}
        }
        self.inner.create(record).await
    }

    async fn list(&self) -> Result<Vec<JobRecord>, RecordStoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match Self::pop(&self.list_faults) {
            Some(Fault::AlreadyExists) => {
                return Err(RecordStoreError::Unavailable(
                    "unexpected conflict on list".to_string(),
                ))
            }
            Some(Fault::Unavailable(msg)) => return Err(RecordStoreError::Unavailable(msg)),
            Some(Fault::Rejected(msg)) => return Err(RecordStoreError::Rejected(msg)),
            Some(Fault::Delay(d)) => tokio::time::sleep(d).await,
            None => {}
        }
        self.inner.list().await
    }
}
