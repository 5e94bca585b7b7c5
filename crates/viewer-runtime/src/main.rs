//! Block viewer entry point.

use anyhow::{Context, Result};
use tracing::info;
use viewer_runtime::config::ViewerConfig;
use viewer_runtime::telemetry::init_logging;
use viewer_runtime::ViewerRuntime;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ViewerConfig::from_env().context("load configuration")?;
    init_logging(&config.telemetry).context("initialize logging")?;

    info!(
        version = blocks_api::VERSION,
        bucket = %config.bucket_dir.display(),
        "starting block viewer"
    );

    ViewerRuntime::new(config).run().await
}
