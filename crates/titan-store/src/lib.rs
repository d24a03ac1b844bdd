//! Record store backends for TrainingJob records.

mod memory;

#[cfg(feature = "kube")]
mod kube;
#[cfg(feature = "test-util")]
pub mod mock;

pub use memory::InMemoryRecordStore;
pub use titan_types::{ControllerStatus, JobRecord, RecordStore, RecordStoreError};

#[cfg(feature = "kube")]
pub use kube::{KubeRecordStore, KubeStoreOptions};
#[cfg(feature = "test-util")]
pub use mock::{Fault, MockRecordStore};
