mod common;

use common::*;
use std::sync::Arc;
use tradechart::chart::{IndicatorFactory, IndicatorManager, MemoryChart, PresetManager};
use tradechart::data::{DuckDbStore, IndicatorStore, MemoryStore};
use tradechart::types::{IndicatorKind, Timeframe};
use tradechart::TradechartError;

fn factory(store: Arc<dyn IndicatorStore>) -> IndicatorFactory {
    IndicatorFactory::new(context(store, Arc::new(closes(&ramp(40)))))
}

fn sample_manager(store: Arc<dyn IndicatorStore>) -> IndicatorManager<MemoryChart> {
    let context = context(store, Arc::new(closes(&ramp(40))));
    let mut manager = IndicatorManager::new(MemoryChart::new(), context, SYMBOL, Timeframe::Hourly);
    manager.create(IndicatorKind::Sma, &[-16776961.0, 20.0, 1.5]).unwrap();
    manager.create(IndicatorKind::Ema, &[-65536.0, 9.0, 2.25]).unwrap();
    manager.create(IndicatorKind::BollingerBands, &[255.0, 20.0, 2.0, 1.0]).unwrap();
    manager
}

fn summary(presets: &PresetManager, slot: usize) -> Vec<(String, IndicatorKind, String)> {
    let mut rows: Vec<(String, IndicatorKind, String)> = presets
        .slot(slot)
        .unwrap()
        .map(|indicators| {
            indicators
                .iter()
                .map(|(id, indicator)| (id.clone(), indicator.kind(), indicator.serialize_params()))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}

#[test]
fn test_round_trip_through_fresh_manager() {
    let store: Arc<dyn IndicatorStore> = Arc::new(MemoryStore::new());
    let manager = sample_manager(store.clone());
    let active: Vec<_> = ["0", "1", "2"].iter().filter_map(|id| manager.get(id)).collect();

    let mut presets = PresetManager::new(store.clone(), factory(store.clone()), "alice", SYMBOL);
    presets.capture(2, active.clone()).unwrap();
    presets.capture(5, active[..1].to_vec()).unwrap();
    presets.store().unwrap();

    let mut reloaded = PresetManager::new(store.clone(), factory(store.clone()), "alice", SYMBOL);
    reloaded.load().unwrap();

    assert_eq!(
        summary(&reloaded, 2),
        vec![
            ("0".to_string(), IndicatorKind::Sma, "-16776961:20:1.5".to_string()),
            ("1".to_string(), IndicatorKind::Ema, "-65536:9:2.25".to_string()),
            ("2".to_string(), IndicatorKind::BollingerBands, "255:20:2.0:1.0".to_string()),
        ]
    );
    assert_eq!(summary(&reloaded, 2), summary(&presets, 2));
    assert_eq!(summary(&reloaded, 5), summary(&presets, 5));
    for slot in [1, 3, 4] {
        assert!(reloaded.slot(slot).unwrap().is_none());
    }

    // timeframe is not persisted
    for indicator in reloaded.slot(2).unwrap().unwrap().values() {
        assert_eq!(indicator.timeframe(), Timeframe::Daily);
    }
}

#[test]
fn test_round_trip_through_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tradechart.duckdb");

    {
        let store: Arc<dyn IndicatorStore> = Arc::new(DuckDbStore::open(&path).unwrap());
        let manager = sample_manager(store.clone());
        let mut presets = PresetManager::new(store.clone(), factory(store), "bob", SYMBOL);
        presets.capture(1, manager.get("2")).unwrap();
        presets.store().unwrap();
    }

    let store: Arc<dyn IndicatorStore> = Arc::new(DuckDbStore::open(&path).unwrap());
    let mut presets = PresetManager::new(store.clone(), factory(store), "bob", SYMBOL);
    presets.load().unwrap();
    assert_eq!(
        summary(&presets, 1),
        vec![("0".to_string(), IndicatorKind::BollingerBands, "255:20:2.0:1.0".to_string())]
    );
}

#[test]
fn test_store_replaces_previous_rows() {
    let store: Arc<dyn IndicatorStore> = Arc::new(MemoryStore::new());
    let manager = sample_manager(store.clone());

    let mut presets = PresetManager::new(store.clone(), factory(store.clone()), "alice", SYMBOL);
    presets.capture(1, manager.all().values()).unwrap();
    presets.capture(3, manager.get("1")).unwrap();
    presets.store().unwrap();

    presets.clear_slot(1).unwrap();
    presets.store().unwrap();

    let mut reloaded = PresetManager::new(store.clone(), factory(store.clone()), "alice", SYMBOL);
    reloaded.load().unwrap();
    assert!(reloaded.slot(1).unwrap().is_none());
    assert_eq!(summary(&reloaded, 3).len(), 1);
}

#[test]
fn test_presets_are_scoped_to_user_and_symbol() {
    let store: Arc<dyn IndicatorStore> = Arc::new(MemoryStore::new());
    let manager = sample_manager(store.clone());

    let mut alice = PresetManager::new(store.clone(), factory(store.clone()), "alice", SYMBOL);
    alice.capture(1, manager.get("0")).unwrap();
    alice.store().unwrap();

    let mut carol = PresetManager::new(store.clone(), factory(store.clone()), "carol", SYMBOL);
    carol.capture(1, manager.get("1")).unwrap();
    carol.store().unwrap();

    let mut other_symbol = PresetManager::new(store.clone(), factory(store.clone()), "alice", "MSFT");
    other_symbol.load().unwrap();
    assert!(other_symbol.slot(1).unwrap().is_none());

    let mut reloaded = PresetManager::new(store.clone(), factory(store.clone()), "alice", SYMBOL);
    reloaded.load().unwrap();
    assert_eq!(summary(&reloaded, 1)[0].1, IndicatorKind::Sma);
}

#[test]
fn test_slot_out_of_range() {
    let store: Arc<dyn IndicatorStore> = Arc::new(MemoryStore::new());
    let mut presets = PresetManager::new(store.clone(), factory(store), "alice", SYMBOL);

    for slot in [0, 6, 100] {
        assert!(matches!(presets.slot(slot), Err(TradechartError::IndexOutOfRange { .. })));
        assert!(matches!(
            presets.capture(slot, std::iter::empty()),
            Err(TradechartError::IndexOutOfRange { .. })
        ));
    }
}

#[test]
fn test_failed_store_leaves_rows_unchanged() {
    let failing = Arc::new(FailingStore::new());
    let store: Arc<dyn IndicatorStore> = failing.clone();
    let manager = sample_manager(store.clone());

    let mut presets = PresetManager::new(store.clone(), factory(store.clone()), "alice", SYMBOL);
    presets.capture(1, manager.get("0")).unwrap();
    presets.store().unwrap();
    let before = store.load_presets("alice", SYMBOL).unwrap();

    presets.capture(1, manager.all().values()).unwrap();
    presets.capture(4, manager.get("2")).unwrap();
    failing.set_failing(true);
    assert!(matches!(presets.store(), Err(TradechartError::PresetPersist(_))));

    assert_eq!(store.load_presets("alice", SYMBOL).unwrap(), before);
    assert_eq!(before.len(), 1);
}

#[test]
fn test_apply_preset_creates_manager_owned_indicators() {
    let store: Arc<dyn IndicatorStore> = Arc::new(MemoryStore::new());
    let source = sample_manager(store.clone());
    let mut presets = PresetManager::new(store.clone(), factory(store.clone()), "alice", SYMBOL);
    let ordered: Vec<_> = ["0", "1", "2"].iter().filter_map(|id| source.get(id)).collect();
    presets.capture(1, ordered).unwrap();

    let mut target = IndicatorManager::new(
        MemoryChart::new(),
        context(store.clone(), Arc::new(closes(&ramp(40)))),
        SYMBOL,
        Timeframe::Daily,
    );
    target.create(IndicatorKind::Sma, &[0.0, 3.0, 1.0]).unwrap();

    let ids = target.apply_preset(presets.slot(1).unwrap().unwrap()).unwrap();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(target.get("1").unwrap().kind(), IndicatorKind::Sma);
    assert_eq!(target.get("3").unwrap().serialize_params(), "255:20:2.0:1.0");
    assert_eq!(target.chart().len(), 1 + 1 + 1 + 3);
}
