use titan_types::{JobRecord, JobStatusView, UNKNOWN_STATE};

/// Projects stored records into client views.
///
/// `status.state` passes through verbatim; a missing, empty or non-string state becomes
/// `"Unknown"`. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusProjector;

impl StatusProjector {
    pub fn project(&self, record: &JobRecord) -> JobStatusView {
        let status = record
            .status()
            .and_then(|s| s.state())
            .unwrap_or(UNKNOWN_STATE);
        JobStatusView {
            name: record.name().to_string(),
            status: status.to_string(),
            image: record.spec.image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use titan_types::{ControllerStatus, JobSpec, RecordMetadata};

    fn record() -> JobRecord {
        JobRecord::new(
            RecordMetadata {
                name: "training-job-c0ffee".to_string(),
                namespace: "default".to_string(),
                uid: None,
                resource_version: None,
                creation_timestamp: None,
            },
            JobSpec {
                image: "busybox".to_string(),
                gpu_count: 1,
                priority: 0,
            },
        )
    }

    #[test]
    fn running_state_is_passed_through_idempotently() {
        let projector = StatusProjector;
        let r = record().with_controller_status(ControllerStatus::with_state("Running"));
        let first = projector.project(&r);
        let second = projector.project(&r);
        assert_eq!(first, second);
        assert_eq!(first.status, "Running");
        assert_eq!(first.name, "training-job-c0ffee");
        assert_eq!(first.image, "busybox");
    }

    #[test]
    fn absent_status_is_unknown() {
        assert_eq!(StatusProjector.project(&record()).status, "Unknown");
    }

    #[test]
    fn partial_or_malformed_status_is_unknown() {
        for raw in [json!({}), json!({ "conditions": [] }), json!({ "state": 7 }), json!(null)] {
            let r = record().with_controller_status(ControllerStatus::from_value(raw));
            assert_eq!(StatusProjector.project(&r).status, "Unknown");
        }
    }

    #[test]
    fn unfamiliar_states_are_not_rewritten() {
        let r = record().with_controller_status(ControllerStatus::with_state("CrashLoopBackOff"));
        assert_eq!(StatusProjector.project(&r).status, "CrashLoopBackOff");
    }
}
