use std::future::Future;
use std::time::Duration;
use titan_types::RecordStoreError;

/// Runs a store call under an optional deadline. Expiry drops the in-flight call.
pub(crate) async fn with_deadline<T, F>(
    timeout: Option<Duration>,
    call: F,
) -> Result<T, RecordStoreError>
where
    F: Future<Output = Result<T, RecordStoreError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            RecordStoreError::Unavailable(format!("store call timed out after {:?}", limit))
        })?,
        None => call.await,
    }
}
