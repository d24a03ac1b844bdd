//! TrainingJob admission API server: POST /jobs, GET /jobs.

use std::sync::Arc;
use titan_api::config::{Config, StoreBackend};
use titan_api::server::{self, AppState};
use titan_store::{InMemoryRecordStore, KubeRecordStore};
use titan_types::RecordStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let store: Arc<dyn RecordStore + Send + Sync> = match config.store {
        StoreBackend::Kube => {
            tracing::info!(
                api = %config.kube_api_url,
                namespace = %config.namespace,
                "using Kubernetes record store"
            );
            Arc::new(KubeRecordStore::new(config.kube_options()?)?)
        }
        StoreBackend::Memory => {
            tracing::warn!(
                namespace = %config.namespace,
                "using in-memory record store; jobs are not reconciled"
            );
            Arc::new(InMemoryRecordStore::new(config.namespace.clone()))
        }
    };

    let state = Arc::new(AppState::from_config(store, &config));
    let app = server::router(state);
    tracing::info!("TrainingJob API listening on {}", config.listen);
    axum::serve(
        tokio::net::TcpListener::bind(config.listen).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
