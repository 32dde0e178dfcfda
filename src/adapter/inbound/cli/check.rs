//! Handler for the `check` command.

use std::path::Path;

use crate::adapter::outbound::sqlite;
use crate::error::Result;
use crate::infrastructure::config::settings::{API_PRO_KEY_ENV, TELEGRAM_TOKEN_ENV};
use crate::infrastructure::config::Config;

/// Validate the configuration file and open the database.
///
/// A missing Telegram token fails the check; the pro API key is optional.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    println!("Config:    {} (valid)", config_path.display());

    let api = if config.api_pro_key.is_some() {
        format!("{} (pro, {API_PRO_KEY_ENV} set)", config.coinpaprika.pro_api_url)
    } else {
        format!("{} (public)", config.coinpaprika.api_url)
    };
    println!("API:       {api}");

    sqlite::open(&config.database)?;
    println!("Database:  {} (migrations applied)", config.database);

    config.require_telegram_token()?;
    println!("Telegram:  {TELEGRAM_TOKEN_ENV} set");

    println!(
        "Schedule:  prices every {}s, alerts every {}s, stats every {}s",
        config.price.refresh_interval_secs,
        config.alerts.check_interval_secs,
        config.stats.flush_interval_secs
    );

    if config.metrics.enabled {
        println!("Metrics:   http://{}/metrics", config.metrics.socket_addr()?);
    } else {
        println!("Metrics:   disabled");
    }
    Ok(())
}
