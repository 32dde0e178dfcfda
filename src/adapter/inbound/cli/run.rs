//! Handler for the `run` command.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

/// Load configuration, start logging and run the bot until shutdown.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "paprika-bot starting"
    );

    bootstrap::run(config).await
}
