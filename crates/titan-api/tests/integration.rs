//! Integration tests: submit/list over HTTP, validation, store failures.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use titan_admission::{AdmissionService, JobRecordBuilder, QueryService, RandomSuffixGenerator};
use titan_api::server::{self, AppState};
use titan_store::{ControllerStatus, Fault, MockRecordStore, RecordStore};
use tower::util::ServiceExt;

fn test_app() -> (axum::Router, Arc<MockRecordStore>) {
    let store = Arc::new(MockRecordStore::new("default"));
    let state = Arc::new(AppState {
        admission: AdmissionService::new(
            store.clone(),
            Arc::new(RandomSuffixGenerator::default()),
            JobRecordBuilder::new("default"),
        )
        .with_store_timeout(Some(Duration::from_millis(200))),
        query: QueryService::new(store.clone())
            .with_store_timeout(Some(Duration::from_millis(200))),
    });
    (server::router(state), store)
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    let j: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, j)
}

fn post_jobs(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/jobs")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get_jobs() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/jobs")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn submit_then_list() {
    let (app, store) = test_app();
    let body = json!({ "image": "pytorch/pytorch:2.3.0", "gpuCount": 2, "priority": 1 });
    let (status, j) = send(&app, post_jobs(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(j["message"], "Job submitted successfully");
    assert_eq!(j["status"], "Queued/Pending");
    let name = j["name"].as_str().unwrap().to_string();
    assert!(name.starts_with("training-job-"));

    let (status, j) = send(&app, get_jobs()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        j,
        json!([{ "name": name, "status": "Unknown", "image": "pytorch/pytorch:2.3.0" }])
    );

    let stored = store.inner().list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].spec.gpu_count, 2);
    assert_eq!(stored[0].spec.priority, 1);
}

#[tokio::test]
async fn list_reflects_controller_status() {
    let (app, store) = test_app();
    let body = json!({ "image": "busybox", "gpu_count": 1, "priority": 0 });
    let (status, j) = send(&app, post_jobs(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    let name = j["name"].as_str().unwrap().to_string();

    assert!(
        store
            .inner()
            .apply_status(&name, ControllerStatus::with_state("Running"))
            .await
    );

    let (_, j) = send(&app, get_jobs()).await;
    assert_eq!(j[0]["name"], name.as_str());
    assert_eq!(j[0]["status"], "Running");
}

#[tokio::test]
async fn empty_store_lists_empty_array() {
    let (app, _) = test_app();
    let (status, j) = send(&app, get_jobs()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(j, json!([]));
}

#[tokio::test]
async fn empty_image_is_invalid_spec_and_not_stored() {
    let (app, store) = test_app();
    let body = json!({ "image": "", "gpuCount": 1, "priority": 0 });
    let (status, j) = send(&app, post_jobs(body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(j["kind"], "InvalidSpec");
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn malformed_bodies_are_invalid_spec() {
    let (app, store) = test_app();
    for body in [
        json!({ "gpuCount": 1, "priority": 0 }).to_string(),
        json!({ "image": "busybox", "gpuCount": "two", "priority": 0 }).to_string(),
        "{not json".to_string(),
    ] {
        let (status, j) = send(&app, post_jobs(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(j["kind"], "InvalidSpec");
    }

    let no_content_type = json!({ "image": "busybox", "gpuCount": 1, "priority": 0 });
    let req = Request::builder()
        .method("POST")
        .uri("/jobs")
        .body(Body::from(no_content_type.to_string()))
        .unwrap();
    let (status, j) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(j["kind"], "InvalidSpec");
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn collision_is_retried_transparently() {
    let (app, store) = test_app();
    store.fail_next_create(Fault::AlreadyExists);
    let body = json!({ "image": "busybox", "gpuCount": 0, "priority": 0 });
    let (status, j) = send(&app, post_jobs(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.create_calls(), 2);

    let stored = store.inner().list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(j["name"], stored[0].name());
}

#[tokio::test]
async fn exhausted_collisions_are_conflict() {
    let (app, store) = test_app();
    for _ in 0..3 {
        store.fail_next_create(Fault::AlreadyExists);
    }
    let body = json!({ "image": "busybox", "gpuCount": 0, "priority": 0 });
    let (status, j) = send(&app, post_jobs(body.to_string())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(j["kind"], "AdmissionExhausted");
    assert!(store.inner().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn store_failures_map_to_stable_kinds() {
    let (app, store) = test_app();
    let body = json!({ "image": "busybox", "gpuCount": 0, "priority": 0 });

    store.fail_next_create(Fault::Unavailable("dial tcp: connection refused".to_string()));
    let (status, j) = send(&app, post_jobs(body.to_string())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(j["kind"], "StoreUnavailable");
    assert!(j["message"].as_str().unwrap().contains("connection refused"));

    store.fail_next_create(Fault::Rejected("forbidden: exceeded quota".to_string()));
    let (status, j) = send(&app, post_jobs(body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(j["kind"], "StoreRejected");
    assert!(j["message"].as_str().unwrap().contains("exceeded quota"));

    assert!(store.inner().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_timeout_returns_error_not_partial_list() {
    let (app, store) = test_app();
    let body = json!({ "image": "busybox", "gpuCount": 0, "priority": 0 });
    send(&app, post_jobs(body.to_string())).await;

    store.fail_next_list(Fault::Delay(Duration::from_secs(5)));
    let (status, j) = send(&app, get_jobs()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(j["kind"], "StoreUnavailable");
    assert!(j.get("name").is_none());
    assert!(!j.is_array());
}

#[tokio::test]
async fn health() {
    let (app, _) = test_app();
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}
