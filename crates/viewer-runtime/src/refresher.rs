//! # Refresher
//!
//! Background task that re-lists the bucket on a fixed interval and pushes
//! the outcome into the cached views. A failed listing is stored on the view
//! as its last error; the previous blocks stay visible.

use crate::adapters::FsBucket;
use blocks_api::{BlocksApi, RefreshError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

pub struct Refresher {
    api: Arc<dyn BlocksApi>,
    bucket: Arc<FsBucket>,
    local: Option<Arc<FsBucket>>,
    interval: Duration,
}

impl Refresher {
    pub fn new(
        api: Arc<dyn BlocksApi>,
        bucket: Arc<FsBucket>,
        local: Option<Arc<FsBucket>>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            bucket,
            local,
            interval,
        }
    }

    /// Sync every view once.
    pub async fn refresh_once(&self) {
        let global = self.bucket.list_metas().await.map_err(RefreshError::new);
        if let Ok(metas) = &global {
            debug!(blocks = metas.len(), "global view synced");
        }
        self.api.set_global(global);

        if let Some(local) = &self.local {
            let loaded = local.list_metas().await.map_err(RefreshError::new);
            if let Ok(metas) = &loaded {
                debug!(blocks = metas.len(), "loaded view synced");
            }
            self.api.set_loaded(loaded);
        }
    }

    /// Refresh immediately, then on every tick until `shutdown` flips to
    /// `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = self.interval.as_secs(), "refresher started");
        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh_once().await,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("refresher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocks_api::adapters::{ExamplePlanner, InMemoryMarker};
    use blocks_api::test_utils::{sample_meta, FixedTimeSource};
    use blocks_api::{BlocksApiConfig, BlocksDependencies, BlocksService};
    use shared_types::{BlockMeta, META_FILENAME};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_block(dir: &Path, meta: &BlockMeta) {
        let block_dir = dir.join(meta.ulid.to_string());
        std::fs::create_dir_all(&block_dir).unwrap();
        std::fs::write(block_dir.join(META_FILENAME), meta.to_json().unwrap()).unwrap();
    }

    fn make_service() -> Arc<BlocksService> {
        let time_source = Arc::new(FixedTimeSource::at(1_600_000_000));
        let deps = BlocksDependencies {
            marker: Arc::new(InMemoryMarker::new(time_source.clone())),
            planner: Arc::new(ExamplePlanner),
            time_source,
        };
        Arc::new(BlocksService::new(deps, BlocksApiConfig::default()))
    }

    #[tokio::test]
    async fn test_refresh_fills_both_views() {
        let bucket_dir = TempDir::new().unwrap();
        let local_dir = TempDir::new().unwrap();
        write_block(bucket_dir.path(), &sample_meta(1));
        write_block(bucket_dir.path(), &sample_meta(2));
        write_block(local_dir.path(), &sample_meta(1));

        let service = make_service();
        let refresher = Refresher::new(
            service.clone(),
            Arc::new(FsBucket::new(bucket_dir.path())),
            Some(Arc::new(FsBucket::new(local_dir.path()))),
            Duration::from_secs(60),
        );
        refresher.refresh_once().await;

        let global = service.blocks(None);
        assert_eq!(global.blocks.len(), 2);
        assert!(global.last_error.is_none());
        assert!(global.refreshed_at.is_some());

        let loaded = service.blocks(Some("loaded"));
        assert_eq!(loaded.blocks.as_slice(), &[sample_meta(1)]);
    }

    #[tokio::test]
    async fn test_loaded_view_untouched_without_local_dir() {
        let bucket_dir = TempDir::new().unwrap();
        write_block(bucket_dir.path(), &sample_meta(1));

        let service = make_service();
        let refresher = Refresher::new(
            service.clone(),
            Arc::new(FsBucket::new(bucket_dir.path())),
            None,
            Duration::from_secs(60),
        );
        refresher.refresh_once().await;

        assert!(service.blocks(Some("loaded")).is_pristine());
    }

    #[tokio::test]
    async fn test_listing_failure_keeps_blocks() {
        let bucket_dir = TempDir::new().unwrap();
        write_block(bucket_dir.path(), &sample_meta(1));

        let service = make_service();
        let refresher = Refresher::new(
            service.clone(),
            Arc::new(FsBucket::new(bucket_dir.path())),
            None,
            Duration::from_secs(60),
        );
        refresher.refresh_once().await;

        let root = bucket_dir.path().to_path_buf();
        drop(bucket_dir);
        assert!(!root.exists());
        refresher.refresh_once().await;

        let global = service.blocks(None);
        assert_eq!(global.blocks.as_slice(), &[sample_meta(1)]);
        let err = global.last_error.unwrap();
        assert!(err.starts_with("list bucket"), "{err}");
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let bucket_dir = TempDir::new().unwrap();
        write_block(bucket_dir.path(), &sample_meta(1));

        let service = make_service();
        let refresher = Refresher::new(
            service.clone(),
            Arc::new(FsBucket::new(bucket_dir.path())),
            None,
            Duration::from_secs(3600),
        );

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(refresher.run(rx));

        // The first tick fires immediately.
        tokio::time::timeout(Duration::from_secs(5), async {
            while service.blocks(None).is_pristine() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(service.blocks(None).blocks.len(), 1);
    }
}
