//! HTTP client for the Kubernetes custom objects API (TrainingJob resources).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use titan_types::{JobRecord, RecordStore, RecordStoreError, API_GROUP, API_VERSION, PLURAL};

#[derive(Debug, Deserialize)]
struct RecordList {
    #[serde(default)]
    items: Vec<JobRecord>,
}

/// Connection settings for [`KubeRecordStore`].
#[derive(Debug, Clone, Default)]
pub struct KubeStoreOptions {
    /// API server base URL, e.g. `https://kubernetes.default.svc`.
    pub api_url: String,
    pub namespace: String,
    pub token: Option<String>,
    /// PEM bundle trusted in addition to the system roots.
    pub ca_cert_pem: Option<Vec<u8>>,
    pub insecure_skip_tls_verify: bool,
    pub timeout: Option<Duration>,
}

/// RecordStore backed by `/apis/batch.rory109.com/v1/namespaces/{ns}/trainingjobs`.
pub struct KubeRecordStore {
    client: reqwest::Client,
    collection_url: String,
    token: Option<String>,
}

impl KubeRecordStore {
    pub fn new(opts: KubeStoreOptions) -> Result<Self, RecordStoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(ref pem) = opts.ca_cert_pem {
            let cert = reqwest::Certificate::from_pem(pem)
                .map_err(|e| RecordStoreError::Rejected(format!("invalid CA bundle: {}", e)))?;
            builder = builder.add_root_certificate(cert);
        }
        if opts.insecure_skip_tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RecordStoreError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            collection_url: collection_url(&opts.api_url, &opts.namespace),
            token: opts.token,
        })
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }
}

fn collection_url(api_url: &str, namespace: &str) -> String {
    format!(
        "{}/apis/{}/{}/namespaces/{}/{}",
        api_url.trim_end_matches('/'),
        API_GROUP,
        API_VERSION,
        namespace,
        PLURAL
    )
}

fn transport_error(e: reqwest::Error) -> RecordStoreError {
    if e.is_timeout() {
        RecordStoreError::Unavailable(format!("request timed out: {}", e))
    } else {
        RecordStoreError::Unavailable(e.to_string())
    }
}

/// Maps a non-success API server response onto the store error taxonomy.
fn classify(status: StatusCode, body: &str, name: Option<&str>) -> RecordStoreError {
    match status {
        StatusCode::CONFLICT => match name {
            Some(name) => RecordStoreError::AlreadyExists(name.to_string()),
            None => {
                RecordStoreError::Unavailable(format!("API server error {}: {}", status, body))
            }
        },
        // 404: the TrainingJob CRD or the namespace is missing.
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::NOT_FOUND
        | StatusCode::UNPROCESSABLE_ENTITY => {
            RecordStoreError::Rejected(format!("API server error {}: {}", status, body))
        }
        _ => RecordStoreError::Unavailable(format!("API server error {}: {}", status, body)),
    }
}

#[async_trait]
impl RecordStore for KubeRecordStore {
    async fn create(&self, record: &JobRecord) -> Result<JobRecord, RecordStoreError> {
        let req = self.authorized(self.client.post(&self.collection_url).json(record));
        let res = req.send().await.map_err(transport_error)?;
        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;
        if !status.is_success() {
            tracing::warn!(name = %record.name(), %status, "create TrainingJob failed");
            return Err(classify(status, &body, Some(record.name())));
        }
        // 2xx means the record is stored; only the echo is unreadable.
        match serde_json::from_str::<JobRecord>(&body) {
            Ok(created) => Ok(created),
            Err(e) => {
                tracing::warn!(
                    name = %record.name(),
                    %status,
                    error = %e,
                    "created TrainingJob but could not parse response body"
                );
                Ok(record.clone())
            }
        }
    }

    async fn list(&self) -> Result<Vec<JobRecord>, RecordStoreError> {
        let req = self.authorized(self.client.get(&self.collection_url));
        let res = req.send().await.map_err(transport_error)?;
        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;
        if !status.is_success() {
            tracing::warn!(%status, "list TrainingJobs failed");
            return Err(classify(status, &body, None));
        }
        let parsed: RecordList = serde_json::from_str(&body).map_err(|e| {
            RecordStoreError::Unavailable(format!("malformed list response: {}", e))
        })?;
        Ok(parsed.items)
    }
}
