//! Price updater behaviour against a scripted ticker feed.

mod support;

use std::sync::Arc;
use std::time::Duration;

use paprika_bot::application::{PriceCache, PriceUpdater, PriceUpdaterConfig};
use paprika_bot::domain::InstrumentId;

use support::feed::ScriptedFeed;
use support::fixtures::quote;

fn updater(feed: Arc<ScriptedFeed>, cache: Arc<PriceCache>) -> PriceUpdater {
    PriceUpdater::new(
        feed,
        cache,
        PriceUpdaterConfig {
            refresh_interval: Duration::from_millis(10),
            retry_delay: Duration::from_millis(10),
        },
    )
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let feed = Arc::new(
        ScriptedFeed::new()
            .then_ok(vec![quote("btc-bitcoin", 95_000.0), quote("eth-ethereum", 3_300.0)])
            .then_fail(),
    );
    let cache = Arc::new(PriceCache::new());
    let updater = updater(Arc::clone(&feed), Arc::clone(&cache));

    assert_eq!(updater.refresh().await.unwrap(), 2);
    let before = cache.snapshot();

    assert!(updater.refresh().await.is_err());

    let after = cache.snapshot();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(cache.get(&InstrumentId::from("btc-bitcoin")).unwrap().price_usd, 95_000.0);
}

#[tokio::test]
async fn successful_refresh_replaces_whole_mapping() {
    let feed = Arc::new(
        ScriptedFeed::new()
            .then_ok(vec![quote("btc-bitcoin", 95_000.0), quote("eth-ethereum", 3_300.0)])
            .then_ok(vec![quote("eth-ethereum", 3_400.0)]),
    );
    let cache = Arc::new(PriceCache::new());
    let updater = updater(feed, Arc::clone(&cache));

    updater.refresh().await.unwrap();
    updater.refresh().await.unwrap();

    assert_eq!(cache.len(), 1);
    assert!(cache.get(&InstrumentId::from("btc-bitcoin")).is_none());
    assert_eq!(cache.get(&InstrumentId::from("eth-ethereum")).unwrap().price_usd, 3_400.0);
}

#[tokio::test]
async fn get_all_is_a_detached_copy() {
    let feed = Arc::new(ScriptedFeed::new().then_ok(vec![quote("btc-bitcoin", 1.0)]));
    let cache = Arc::new(PriceCache::new());
    updater(feed, Arc::clone(&cache)).refresh().await.unwrap();

    let mut copy = cache.get_all();
    copy.clear();

    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn run_loop_survives_failures() {
    let feed = Arc::new(
        ScriptedFeed::new()
            .then_fail()
            .then_fail()
            .then_ok(vec![quote("btc-bitcoin", 1.0)]),
    );
    let cache = Arc::new(PriceCache::new());
    let task = tokio::spawn(updater(Arc::clone(&feed), Arc::clone(&cache)).run());

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while cache.is_empty() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    task.abort();

    assert_eq!(cache.len(), 1);
    assert!(feed.fetches() >= 3);
}
