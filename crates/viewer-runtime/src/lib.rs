//! # Block Viewer Runtime
//!
//! Wires the blocks API to a directory-backed bucket and serves it.
//!
//! ## Startup Sequence
//!
//! 1. Load and validate configuration (from env)
//! 2. Initialize logging
//! 3. Build the bucket adapter and the blocks service
//! 4. Spawn the refresher
//! 5. Serve HTTP until Ctrl+C, then stop the refresher

pub mod adapters;
pub mod config;
pub mod refresher;
pub mod telemetry;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use blocks_api::adapters::ExamplePlanner;
use blocks_api::{BlocksApi, BlocksDependencies, BlocksService, SystemTimeSource};

use crate::adapters::FsBucket;
use crate::config::ViewerConfig;
use crate::refresher::Refresher;

/// The block viewer process.
pub struct ViewerRuntime {
    config: ViewerConfig,
    service: Arc<BlocksService>,
    bucket: Arc<FsBucket>,
    local: Option<Arc<FsBucket>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl ViewerRuntime {
    pub fn new(config: ViewerConfig) -> Self {
        let time_source = Arc::new(SystemTimeSource);
        let bucket = Arc::new(FsBucket::with_time_source(
            &config.bucket_dir,
            time_source.clone(),
        ));
        let local = config
            .local_dir
            .as_ref()
            .map(|dir| Arc::new(FsBucket::with_time_source(dir, time_source.clone())));

        let deps = BlocksDependencies {
            marker: bucket.clone(),
            planner: Arc::new(ExamplePlanner),
            time_source,
        };
        let service = Arc::new(BlocksService::new(deps, config.api_config()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            service,
            bucket,
            local,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn service(&self) -> Arc<BlocksService> {
        Arc::clone(&self.service)
    }

    pub fn router(&self) -> Router {
        let api: Arc<dyn BlocksApi> = self.service.clone();
        blocks_api::http::build_router(api, self.service.config())
    }

    fn refresher(&self) -> Refresher {
        Refresher::new(
            self.service.clone(),
            self.bucket.clone(),
            self.local.clone(),
            self.config.refresh_interval,
        )
    }

    /// Sync all views once without starting the background task.
    pub async fn refresh_now(&self) {
        self.refresher().refresh_once().await;
    }

    /// Bind the configured address and serve until Ctrl+C.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.http_addr)
            .await
            .with_context(|| format!("bind {}", self.config.http_addr))?;

        self.serve(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        })
        .await
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let refresher = tokio::spawn(self.refresher().run(self.shutdown_rx.clone()));

        info!(
            addr = %listener.local_addr().context("listener address")?,
            bucket = %self.bucket.root().display(),
            admin_disabled = self.service.config().disable_admin_operations,
            "block viewer listening"
        );

        let shutdown_tx = self.shutdown_tx.clone();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("Initiating graceful shutdown...");
                let _ = shutdown_tx.send(true);
            })
            .await
            .context("http server")?;

        // Covers the server exiting on its own.
        let _ = self.shutdown_tx.send(true);
        refresher.await.context("refresher task")?;

        info!("Shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocks_api::test_utils::sample_meta;
    use shared_types::META_FILENAME;
    use std::time::Duration;
    use tempfile::TempDir;

    fn make_runtime(bucket: &TempDir) -> ViewerRuntime {
        let config = ViewerConfig {
            http_addr: "127.0.0.1:0".parse().unwrap(),
            bucket_dir: bucket.path().to_path_buf(),
            label: "test".to_string(),
            ..Default::default()
        };
        ViewerRuntime::new(config)
    }

    #[tokio::test]
    async fn test_refresh_now_populates_global_view() {
        let bucket = TempDir::new().unwrap();
        let meta = sample_meta(1);
        let dir = bucket.path().join(meta.ulid.to_string());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(META_FILENAME), meta.to_json().unwrap()).unwrap();

        let runtime = make_runtime(&bucket);
        runtime.refresh_now().await;

        let snapshot = runtime.service().blocks(None);
        assert_eq!(snapshot.label, "test");
        assert_eq!(snapshot.blocks.as_slice(), &[meta]);
    }

    #[tokio::test]
    async fn test_mark_goes_to_bucket() {
        let bucket = TempDir::new().unwrap();
        let meta = sample_meta(1);
        let dir = bucket.path().join(meta.ulid.to_string());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(META_FILENAME), meta.to_json().unwrap()).unwrap();

        let runtime = make_runtime(&bucket);
        let request =
            blocks_api::MarkRequest::new(meta.ulid.to_string(), "NO_COMPACTION", "manual");
        runtime.service().mark(&request).await.unwrap();

        assert!(dir.join(shared_types::NO_COMPACT_MARK_FILENAME).exists());
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown_future() {
        let bucket = TempDir::new().unwrap();
        let runtime = make_runtime(&bucket);
        let service = runtime.service();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(runtime.serve(listener, async move {
            let _ = rx.await;
        }));

        // The refresher's first sync stamps the empty bucket.
        tokio::time::timeout(Duration::from_secs(5), async {
            while service.blocks(None).is_pristine() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
