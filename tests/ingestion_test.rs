mod common;

use std::sync::Arc;

use common::*;
use lava_indexer::application::indexer::{
    CatchUpReport, HeightOutcome, MetadataSynchronizer, SyncGap, TickOutcome,
};
use lava_indexer::domain::models::{ChainMetadata, Plan, ProviderStake, RawBlock};
use lava_indexer::domain::services::{BlockAssembler, CacheStats, DimensionCache};
use lava_indexer::infrastructure::persistence::entities::{
    blocks, consumers, events, plans, provider_stakes, providers, relay_payments, specs,
    subscription_buys,
};
use lava_indexer::infrastructure::persistence::{BlockStore, DatabaseStore};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

async fn count<E>(store: &DatabaseStore) -> u64
where
    E: EntityTrait,
    E::Model: Sync,
{
    E::find().count(store.connection()).await.unwrap()
}

async fn moniker_of(store: &DatabaseStore, address: &str) -> String {
    providers::Entity::find_by_id(address.to_string())
        .one(store.connection())
        .await
        .unwrap()
        .unwrap()
        .moniker
}

fn busy_chain(tip: u64) -> Arc<ScriptedChain> {
    let chain = ScriptedChain::new(tip);
    chain.set_events(1, vec![stake_event(PROVIDER, "alpha", "ETH1", "AA01")]);
    chain.set_events(
        2,
        vec![
            relay_payment(PROVIDER, "ETH1", "10", "BB01"),
            relay_payment(PROVIDER, "NEAR", "20", "BB02"),
        ],
    );
    chain.set_events(3, vec![subscription_buy("explorer", "CC01")]);
    chain
}

#[tokio::test]
async fn test_reingesting_a_range_writes_nothing_twice() {
    let chain = busy_chain(3);
    let store = sqlite_store().await;

    let first = orchestrator(&chain, &store, &Arc::new(DimensionCache::new()))
        .run_catch_up(1, 3)
        .await;
    assert_eq!(first.committed, 3);
    assert_eq!(first.skipped, 0);

    // Block 4 names the same provider without a moniker; a cold cache re-sends every dimension
    chain.set_events(4, vec![relay_payment(PROVIDER, "ETH1", "5", "DD01")]);
    let second = orchestrator(&chain, &store, &Arc::new(DimensionCache::new()))
        .run_catch_up(1, 4)
        .await;
    assert_eq!(second.committed, 1);
    assert_eq!(second.skipped, 3);

    assert_eq!(count::<blocks::Entity>(&store).await, 4);
    assert_eq!(count::<events::Entity>(&store).await, 1);
    assert_eq!(count::<relay_payments::Entity>(&store).await, 3);
    assert_eq!(count::<subscription_buys::Entity>(&store).await, 1);
    assert_eq!(count::<providers::Entity>(&store).await, 1);
    assert_eq!(count::<specs::Entity>(&store).await, 2);
    assert_eq!(count::<consumers::Entity>(&store).await, 1);
    assert_eq!(moniker_of(&store, PROVIDER).await, "alpha");
}

#[tokio::test]
async fn test_failed_commit_leaves_no_trace() {
    let chain = ScriptedChain::new(5);
    chain.set_events(
        5,
        vec![
            stake_event(PROVIDER, "alpha", "ETH1", "AA01"),
            relay_payment(PROVIDER, "ETH1", "10", "AA02"),
        ],
    );
    let store = sqlite_store().await;
    let cache = Arc::new(DimensionCache::new());
    let orchestrator = orchestrator(&chain, &store, &cache);

    store
        .connection()
        .execute_unprepared(
            "CREATE TRIGGER fail_relay_payments BEFORE INSERT ON relay_payments \
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
        )
        .await
        .unwrap();

    assert!(orchestrator.process_height(5).await.is_err());

    assert_eq!(count::<blocks::Entity>(&store).await, 0);
    assert_eq!(count::<providers::Entity>(&store).await, 0);
    assert_eq!(count::<specs::Entity>(&store).await, 0);
    assert_eq!(count::<events::Entity>(&store).await, 0);
    assert_eq!(store.contiguous_height(5).await.unwrap(), None);
    assert_eq!(cache.stats(), CacheStats::default());

    store
        .connection()
        .execute_unprepared("DROP TRIGGER fail_relay_payments;")
        .await
        .unwrap();

    assert_eq!(
        orchestrator.process_height(5).await.unwrap(),
        HeightOutcome::Committed
    );
    assert_eq!(count::<blocks::Entity>(&store).await, 1);
    assert_eq!(count::<events::Entity>(&store).await, 1);
    assert_eq!(count::<relay_payments::Entity>(&store).await, 1);
    assert_eq!(cache.stats().providers, 1);
    assert!(cache.has_spec("ETH1"));
}

#[tokio::test]
async fn test_every_height_failing_once_still_completes() {
    let chain = ScriptedChain::new(6);
    for height in 1..=6 {
        chain.set_events(height, vec![relay_payment(PROVIDER, "ETH1", "10", "AA01")]);
        chain.fail_height(height, 1);
    }
    let store = sqlite_store().await;

    let report = orchestrator(&chain, &store, &Arc::new(DimensionCache::new()))
        .run_catch_up(1, 6)
        .await;

    assert_eq!(report.committed, 6);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failed_attempts, 6);
    assert_eq!(store.contiguous_height(1).await.unwrap(), Some(6));
    assert_eq!(count::<relay_payments::Entity>(&store).await, 6);

    let fetched = chain.fetched();
    assert_eq!(fetched.len(), 12);
    for height in 1..=6 {
        assert_eq!(fetched.iter().filter(|h| **h == height).count(), 2);
    }
}

#[tokio::test]
async fn test_malformed_event_does_not_block_the_rest() {
    let chain = ScriptedChain::new(7);
    let events = (0..10)
        .map(|i| {
            let cu = if i == 6 { "abc".to_string() } else { (i + 1).to_string() };
            relay_payment(PROVIDER, "ETH1", &cu, "AA01")
        })
        .collect();
    chain.set_events(7, events);
    let store = sqlite_store().await;

    let outcome = orchestrator(&chain, &store, &Arc::new(DimensionCache::new()))
        .process_height(7)
        .await
        .unwrap();

    assert_eq!(outcome, HeightOutcome::Committed);
    assert_eq!(count::<blocks::Entity>(&store).await, 1);
    assert_eq!(count::<relay_payments::Entity>(&store).await, 9);

    let rows = relay_payments::Entity::find()
        .all(store.connection())
        .await
        .unwrap();
    assert!(rows.iter().all(|row| row.cu > 0 && row.pay == 1200));
    assert!(rows.iter().all(|row| row.qos_sync == Some(0.75)));
}

#[tokio::test]
async fn test_tick_closes_the_gap_from_stored_height() {
    let chain = ScriptedChain::new(5);
    let store = sqlite_store().await;
    let cache = Arc::new(DimensionCache::new());

    orchestrator(&chain, &store, &cache).run_catch_up(1, 5).await;
    chain.clear_fetched();
    chain.set_tip(8);

    let mut processor = processor(&chain, &store, &cache);
    match processor.tick().await {
        TickOutcome::Synced {
            gap,
            report,
            refreshed,
        } => {
            assert_eq!(gap, SyncGap { from: 6, to: 8 });
            assert_eq!(report.committed, 3);
            assert_eq!(report.failed_attempts, 0);
            assert!(!refreshed);
        }
        other => panic!("unexpected tick outcome {:?}", other),
    }

    let mut fetched = chain.fetched();
    fetched.sort_unstable();
    assert_eq!(fetched, vec![6, 7, 8]);
    assert_eq!(store.contiguous_height(1).await.unwrap(), Some(8));
    assert_eq!(chain.metadata_calls(), 0);
}

#[tokio::test]
async fn test_height_left_behind_by_an_aborted_run_is_retried() {
    let chain = ScriptedChain::new(6);
    for height in 1..=6 {
        chain.set_events(height, vec![relay_payment(PROVIDER, "ETH1", "10", "AA01")]);
    }
    chain.fail_height(1, 3);
    let store = sqlite_store().await;
    let cache = Arc::new(DimensionCache::new());

    // An earlier run stopped while height 1 was still failing
    let orchestrator = orchestrator(&chain, &store, &cache);
    for height in 1..=6 {
        let _ = orchestrator.process_height(height).await;
    }
    assert!(store.has_block(6).await.unwrap());
    assert!(!store.has_block(1).await.unwrap());
    assert_eq!(store.contiguous_height(1).await.unwrap(), None);

    chain.fail_height(1, 0);
    chain.clear_fetched();
    let mut processor = processor(&chain, &store, &cache);
    match processor.tick().await {
        TickOutcome::Synced { gap, report, .. } => {
            assert_eq!(gap, SyncGap { from: 1, to: 6 });
            assert_eq!(report.committed, 1);
            assert_eq!(report.skipped, 5);
        }
        other => panic!("unexpected tick outcome {:?}", other),
    }
    assert_eq!(chain.fetched(), vec![1]);
    assert_eq!(store.contiguous_height(1).await.unwrap(), Some(6));
    assert_eq!(count::<relay_payments::Entity>(&store).await, 6);

    assert_eq!(
        processor.tick().await,
        TickOutcome::UpToDate { chain_height: 6 }
    );
}

#[tokio::test]
async fn test_steady_state_refreshes_metadata() {
    let chain = ScriptedChain::new(1);
    chain.set_metadata(ChainMetadata {
        specs: vec!["ETH1".to_string()],
        ..ChainMetadata::default()
    });
    let store = sqlite_store().await;
    let cache = Arc::new(DimensionCache::new());
    let mut processor = processor(&chain, &store, &cache);

    match processor.tick().await {
        TickOutcome::Synced { gap, refreshed, .. } => {
            assert!(gap.is_steady_state());
            assert!(refreshed);
        }
        other => panic!("unexpected tick outcome {:?}", other),
    }
    assert_eq!(chain.metadata_calls(), 1);
    assert!(cache.has_spec("ETH1"));

    assert_eq!(
        processor.tick().await,
        TickOutcome::UpToDate { chain_height: 1 }
    );
    assert_eq!(chain.metadata_calls(), 1);
}

#[tokio::test]
async fn test_metadata_failure_is_not_fatal() {
    let chain = ScriptedChain::new(1);
    chain.set_metadata_unavailable(true);
    let store = sqlite_store().await;
    let cache = Arc::new(DimensionCache::new());
    let mut processor = processor(&chain, &store, &cache);

    processor.initialize().await;

    match processor.tick().await {
        TickOutcome::Synced {
            report, refreshed, ..
        } => {
            assert_eq!(report.committed, 1);
            assert!(!refreshed);
        }
        other => panic!("unexpected tick outcome {:?}", other),
    }
    assert_eq!(store.contiguous_height(1).await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_unreachable_chain_skips_the_tick() {
    let chain = ScriptedChain::new(10);
    chain.set_unavailable(true);
    let store = sqlite_store().await;
    let mut processor = processor(&chain, &store, &Arc::new(DimensionCache::new()));

    assert_eq!(processor.tick().await, TickOutcome::ChainUnavailable);
    assert!(chain.fetched().is_empty());
    assert_eq!(count::<blocks::Entity>(&store).await, 0);

    chain.set_unavailable(false);
    match processor.tick().await {
        TickOutcome::Synced { gap, report, .. } => {
            assert_eq!(gap, SyncGap { from: 1, to: 10 });
            assert_eq!(
                report,
                CatchUpReport {
                    elapsed: report.elapsed,
                    committed: 10,
                    skipped: 0,
                    failed_attempts: 0,
                }
            );
        }
        other => panic!("unexpected tick outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_metadata_sync_updates_placeholders_and_monikers() {
    let chain = busy_chain(3);
    let store = sqlite_store().await;
    let cache = Arc::new(DimensionCache::new());
    orchestrator(&chain, &store, &cache).run_catch_up(1, 3).await;

    let placeholder = plans::Entity::find_by_id("explorer".to_string())
        .one(store.connection())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(placeholder.price, 0);

    chain.set_metadata(ChainMetadata {
        specs: vec!["ETH1".to_string(), "LAV1".to_string()],
        provider_stakes: vec![
            ProviderStake {
                provider: PROVIDER.to_string(),
                moniker: "alpha-nodes".to_string(),
                spec: "ETH1".to_string(),
                stake: Some(50_000_000_000),
            },
            ProviderStake {
                provider: OTHER_PROVIDER.to_string(),
                moniker: String::new(),
                spec: "LAV1".to_string(),
                stake: None,
            },
        ],
        plans: vec![Plan {
            id: "explorer".to_string(),
            description: "Explorer plan".to_string(),
            price: 500,
        }],
    });

    let synchronizer = MetadataSynchronizer::new(chain.clone(), store.clone(), cache.clone());
    let stats = synchronizer.refresh().await.unwrap();
    assert_eq!(stats.providers, 2);

    let plan = plans::Entity::find_by_id("explorer".to_string())
        .one(store.connection())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.price, 500);
    assert_eq!(plan.description, "Explorer plan");
    assert_eq!(moniker_of(&store, PROVIDER).await, "alpha-nodes");
    assert_eq!(moniker_of(&store, OTHER_PROVIDER).await, "");
    assert_eq!(count::<specs::Entity>(&store).await, 3);

    // A later placeholder for the same plan must not clobber the synced price
    chain.set_events(4, vec![subscription_buy("explorer", "EE01")]);
    orchestrator(&chain, &store, &Arc::new(DimensionCache::new()))
        .process_height(4)
        .await
        .unwrap();
    let plan = plans::Entity::find_by_id("explorer".to_string())
        .one(store.connection())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.price, 500);
}

#[tokio::test]
async fn test_metadata_sync_replaces_the_stake_snapshot() {
    let chain = ScriptedChain::new(1);
    let store = sqlite_store().await;
    let synchronizer =
        MetadataSynchronizer::new(chain.clone(), store.clone(), Arc::new(DimensionCache::new()));

    let stake = |provider: &str, spec: &str, amount: Option<i64>| ProviderStake {
        provider: provider.to_string(),
        moniker: String::new(),
        spec: spec.to_string(),
        stake: amount,
    };

    chain.set_metadata(ChainMetadata {
        specs: vec!["ETH1".to_string(), "NEAR".to_string()],
        provider_stakes: vec![
            stake(PROVIDER, "ETH1", Some(50_000_000_000)),
            stake(PROVIDER, "NEAR", None),
            stake(OTHER_PROVIDER, "ETH1", Some(7)),
        ],
        plans: Vec::new(),
    });
    synchronizer.refresh().await.unwrap();
    assert_eq!(count::<provider_stakes::Entity>(&store).await, 3);

    let stored = provider_stakes::Entity::find_by_id((PROVIDER.to_string(), "NEAR".to_string()))
        .one(store.connection())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.stake, None);

    // The provider left NEAR and restaked on ETH1
    chain.set_metadata(ChainMetadata {
        specs: vec!["ETH1".to_string(), "NEAR".to_string()],
        provider_stakes: vec![stake(PROVIDER, "ETH1", Some(60_000_000_000))],
        plans: Vec::new(),
    });
    synchronizer.refresh().await.unwrap();

    let rows = provider_stakes::Entity::find()
        .all(store.connection())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].provider, PROVIDER);
    assert_eq!(rows[0].spec_id, "ETH1");
    assert_eq!(rows[0].stake, Some(60_000_000_000));

    // A failed snapshot leaves the previous one in place
    chain.set_metadata_unavailable(true);
    assert!(synchronizer.refresh().await.is_err());
    assert_eq!(count::<provider_stakes::Entity>(&store).await, 1);
}

#[tokio::test]
async fn test_warm_cache_suppresses_known_dimensions() {
    let chain = busy_chain(3);
    let store = sqlite_store().await;
    orchestrator(&chain, &store, &Arc::new(DimensionCache::new()))
        .run_catch_up(1, 3)
        .await;

    let cache = Arc::new(DimensionCache::new());
    let synchronizer = MetadataSynchronizer::new(chain.clone(), store.clone(), cache.clone());
    let stats = synchronizer.warm_from_store().await.unwrap();
    assert_eq!(
        stats,
        CacheStats {
            providers: 1,
            specs: 2,
            plans: 1,
            consumers: 1,
        }
    );

    let assembled = BlockAssembler::new(cache)
        .assemble(&RawBlock {
            height: 4,
            timestamp: block_time(4),
            events: vec![
                relay_payment(PROVIDER, "NEAR", "7", "FF01"),
                subscription_buy("explorer", "FF02"),
            ],
        })
        .unwrap();
    assert!(assembled.dimensions.is_empty());
    assert_eq!(assembled.fact_count(), 2);
}
