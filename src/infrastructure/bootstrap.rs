//! Composition root: wires adapters into services and runs the bot.

use std::sync::Arc;

use teloxide::Bot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::adapter::inbound::http::{self, MetricsExporter};
use crate::adapter::inbound::telegram::{run_dispatcher, BotContext, CommandHandler};
use crate::adapter::outbound::coinpaprika::CoinPaprikaClient;
use crate::adapter::outbound::sqlite::{self, SqliteAlertStore, SqliteMetricStore};
use crate::adapter::outbound::telegram::TelegramNotifier;
use crate::application::stats::run_flusher;
use crate::application::{
    AlertEvaluator, AlertService, BotStats, PriceCache, PriceUpdater, RestartPolicy, Supervisor,
};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::{AlertStore, MetricStore, Notifier};

/// Run the bot until Ctrl-C or SIGTERM.
///
/// Opens the database, restores statistics, starts the supervised
/// background loops and the metrics endpoint, then polls Telegram. On
/// shutdown the loops are stopped and statistics are flushed one last time.
pub async fn run(config: Config) -> Result<()> {
    let token = config.require_telegram_token()?.to_string();

    let pool = sqlite::open(&config.database)?;
    info!(database = %config.database, "Database initialized");
    let alert_store: Arc<dyn AlertStore> = Arc::new(SqliteAlertStore::new(pool.clone()));
    let metric_store: Arc<dyn MetricStore> = Arc::new(SqliteMetricStore::new(pool));

    let stats = Arc::new(restore_stats(metric_store.as_ref()).await);

    let client = Arc::new(CoinPaprikaClient::from_config(
        &config.coinpaprika,
        config.api_pro_key.clone(),
    )?);
    info!(
        base_url = client.base_url(),
        pro = config.api_pro_key.is_some(),
        "CoinPaprika client ready"
    );

    let cache = Arc::new(PriceCache::new());
    let bot = Bot::new(token);
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(bot.clone()));
    let policy = config.supervisor.to_policy();

    let updater = PriceUpdater::new(
        client.clone(),
        Arc::clone(&cache),
        config.price.to_updater_config(),
    );
    let evaluator = AlertEvaluator::new(
        Arc::clone(&alert_store),
        Arc::clone(&cache),
        notifier,
        config.alerts.delivery,
        config.alerts.check_interval(),
    );
    let flusher_stats = Arc::clone(&stats);
    let flusher_store = Arc::clone(&metric_store);
    let flush_interval = config.stats.flush_interval();

    let mut tasks = vec![
        spawn_supervised("price_updater", policy.clone(), move || updater.clone().run()),
        spawn_supervised("alert_evaluator", policy.clone(), move || {
            evaluator.clone().run()
        }),
        spawn_supervised("stats_flusher", policy.clone(), move || {
            run_flusher(
                Arc::clone(&flusher_stats),
                Arc::clone(&flusher_store),
                flush_interval,
            )
        }),
    ];

    if config.metrics.enabled {
        let addr = config.metrics.socket_addr()?;
        let exporter = Arc::new(MetricsExporter::new(Arc::clone(&stats))?);
        tasks.push(spawn_supervised("metrics_server", policy, move || {
            http::serve(addr, Arc::clone(&exporter))
        }));
    } else {
        info!("Metrics endpoint disabled");
    }

    let handler = CommandHandler::new(
        client,
        AlertService::new(alert_store, cache),
        config.telegram.handler_config(),
    );
    let context = Arc::new(BotContext {
        handler,
        stats: Arc::clone(&stats),
    });

    run_dispatcher(
        bot,
        context,
        config.telegram.updates_timeout(),
        shutdown_signal(),
    )
    .await;

    for task in &tasks {
        task.abort();
    }
    for task in tasks {
        // A dropped supervisor aborts its running child.
        let _ = task.await;
    }
    if let Err(e) = stats.flush(metric_store.as_ref()).await {
        warn!(error = %e, "Final stats flush failed");
    }

    info!("Bot stopped");
    Ok(())
}

async fn restore_stats(store: &dyn MetricStore) -> BotStats {
    match store.load().await {
        Ok(snapshot) => {
            info!(
                commands = snapshot.commands_processed,
                messages = snapshot.messages_handled,
                channels = snapshot.channel_count(),
                "Stats restored"
            );
            BotStats::restore(snapshot)
        }
        Err(e) => {
            warn!(error = %e, "Failed to load stats, starting from zero");
            BotStats::new()
        }
    }
}

fn spawn_supervised<F, Fut>(name: &'static str, policy: RestartPolicy, factory: F) -> JoinHandle<u32>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<()>> + Send + 'static,
{
    tokio::spawn(Supervisor::new(name, policy).run(factory))
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Ctrl-C received, shutting down"),
        () = terminate => info!("SIGTERM received, shutting down"),
    }
}
