//! Integration tests for cache/store synchronization.

use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use stockroom_core::{InventoryItem, Money, SignalMode};
use stockroom_db::{Database, DbConfig, ItemStore, MemoryStore};
use stockroom_sync::{
    CommandOutcome, EngineOptions, FixedClock, FrameBuffer, InventoryCommand, InventoryEngine,
    NoOpView, PersistError, StoreOp,
};

// ============================================================================
// Helpers
// ============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn yesterday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
}

fn next_year() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn options() -> EngineOptions {
    EngineOptions::default().with_clock(FixedClock(today()))
}

fn item(id: &str, name: &str, quantity: i64, cents: i64, expires: NaiveDate) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        name: name.to_string(),
        quantity,
        price: Money::from_cents(cents),
        expiration_date: expires,
    }
}

async fn memory_engine(store: Arc<MemoryStore>) -> InventoryEngine<MemoryStore> {
    InventoryEngine::load(store, Arc::new(NoOpView), options())
        .await
        .unwrap()
}

// ============================================================================
// Round Trip
// ============================================================================

#[tokio::test]
async fn create_then_load_all_round_trips_through_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stockroom.db");

    let db = Database::open(DbConfig::new(&path)).await.unwrap();
    let mut engine = InventoryEngine::load(Arc::new(db.items()), Arc::new(NoOpView), options())
        .await
        .unwrap();

    let created = engine
        .create("Milk", 10, Money::from_cents(250), next_year())
        .unwrap();
    let original = created.value.clone();
    created.persist.wait().await.unwrap();

    assert_eq!(engine.load_all().await.unwrap(), 1);
    assert_eq!(engine.get(&original.id), Some(original.clone()));

    // A second session on the same file sees the same record.
    let reopened = Database::open(DbConfig::new(&path)).await.unwrap();
    let engine = InventoryEngine::load(Arc::new(reopened.items()), Arc::new(NoOpView), options())
        .await
        .unwrap();
    assert_eq!(engine.snapshot().to_vec(), vec![original]);

    db.close().await;
    reopened.close().await;
}

#[tokio::test]
async fn edits_replace_whole_record_in_sqlite() {
    let db = Database::open(DbConfig::in_memory()).await.unwrap();
    let repo = Arc::new(db.items());
    let mut engine = InventoryEngine::load(Arc::clone(&repo), Arc::new(NoOpView), options())
        .await
        .unwrap();

    let id = engine
        .create("Milk", 10, Money::from_cents(250), next_year())
        .unwrap()
        .into_value()
        .id;
    let _ = engine.rename(&id, "Oat Milk").unwrap();
    let _ = engine.set_price(&id, Money::from_cents(310)).unwrap();
    let _ = engine.restock(&id, 24).unwrap();
    engine.flush().await.unwrap();

    let stored = repo.get(&id).await.unwrap().unwrap();
    assert_eq!(stored, engine.get(&id).unwrap());
    assert_eq!(repo.count().await.unwrap(), 1);

    let _ = engine.remove(&id).unwrap();
    engine.flush().await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 0);
}

// ============================================================================
// Summary + Sweep Scenario
// ============================================================================

#[tokio::test]
async fn milk_scenario_summary_and_sweep() {
    let store = Arc::new(MemoryStore::with_items(vec![
        item("a", "Milk", 10, 250, yesterday()),
        item("b", "Milk", 5, 300, next_year()),
    ]));
    let view = Arc::new(FrameBuffer::new());
    let mut engine = InventoryEngine::load(Arc::clone(&store), view.clone(), options())
        .await
        .unwrap();

    let summary = engine.summary();
    assert_eq!(summary.unique_name_count, 1);
    assert_eq!(summary.total_quantity, 15);
    assert_eq!(summary.total_value, Money::from_cents(4000));
    // Signals reflect only the last item processed ("b": fresh, in stock).
    assert_eq!(summary.spoilage_count, 0);
    assert_eq!(summary.restock_signal, 0);
    assert_eq!(view.latest().unwrap().summary, summary);

    let sweep = engine.sweep_expired();
    assert_eq!(sweep.value, vec!["a".to_string()]);
    sweep.persist.wait().await.unwrap();

    assert_eq!(engine.snapshot().to_vec(), vec![item("b", "Milk", 5, 300, next_year())]);
    assert_eq!(store.get_all().await.unwrap().len(), 1);
    assert_eq!(view.latest().unwrap().summary.total_quantity, 5);
}

#[tokio::test]
async fn accumulate_mode_counts_across_collection() {
    let store = Arc::new(MemoryStore::with_items(vec![
        item("a", "Milk", 0, 250, yesterday()),
        item("b", "Bread", 0, 300, today()),
        item("c", "Eggs", 5, 400, next_year()),
    ]));
    let engine = InventoryEngine::load(
        store,
        Arc::new(NoOpView),
        options().with_signal_mode(SignalMode::Accumulate),
    )
    .await
    .unwrap();

    let summary = engine.summary();
    assert_eq!(summary.spoilage_count, 2);
    assert_eq!(summary.restock_signal, 2);
}

// ============================================================================
// Store Failures
// ============================================================================

#[tokio::test]
async fn store_failure_does_not_roll_back_cache() {
    let store = Arc::new(MemoryStore::with_items(vec![item("a", "Milk", 10, 250, next_year())]));
    let mut engine = memory_engine(Arc::clone(&store)).await;

    store.fail_writes(true);
    let mutation = engine.set_quantity("a", 3).unwrap();
    assert_eq!(mutation.value.quantity, 3);

    let err = mutation.persist.wait().await.unwrap_err();
    assert!(matches!(err, PersistError::Store { op: StoreOp::Put, .. }));
    assert_eq!(engine.get("a").unwrap().quantity, 3);
    assert_eq!(store.get("a").await.unwrap().unwrap().quantity, 10);
    assert_eq!(engine.persist_stats().failed(), 1);

    // The next successful write to the same id heals the store.
    store.fail_writes(false);
    engine.rename("a", "Whole Milk").unwrap().persist.wait().await.unwrap();
    let stored = store.get("a").await.unwrap().unwrap();
    assert_eq!(stored.quantity, 3);
    assert_eq!(stored.name, "Whole Milk");
}

#[tokio::test]
async fn restock_all_applies_to_every_item_when_writes_fail() {
    let store = Arc::new(MemoryStore::with_items(vec![
        item("a", "Flour", 2, 199, next_year()),
        item("b", "Sugar", 90, 149, next_year()),
        item("c", "Salt", 0, 99, next_year()),
    ]));
    let mut engine = memory_engine(Arc::clone(&store)).await;
    store.fail_writes(true);

    let mutation = engine.restock_all(50).unwrap();
    assert_eq!(mutation.value, vec!["a".to_string(), "c".to_string()]);

    let failures = mutation.persist.wait_all().await;
    assert_eq!(failures.len(), 2);
    assert_eq!(engine.get("a").unwrap().quantity, 50);
    assert_eq!(engine.get("b").unwrap().quantity, 90);
    assert_eq!(engine.get("c").unwrap().quantity, 50);
}

#[tokio::test]
async fn load_all_replaces_cache_and_drops_unpersisted_changes() {
    let store = Arc::new(MemoryStore::with_items(vec![item("a", "Milk", 10, 250, next_year())]));
    let mut engine = memory_engine(Arc::clone(&store)).await;

    store.fail_writes(true);
    let _ = engine
        .create("Bread", 3, Money::from_cents(199), next_year())
        .unwrap();
    engine.flush().await.unwrap();
    assert_eq!(engine.len(), 2);

    assert_eq!(engine.load_all().await.unwrap(), 1);
    assert_eq!(engine.snapshot().to_vec(), vec![item("a", "Milk", 10, 250, next_year())]);
}

// ============================================================================
// Store Lag
// ============================================================================

#[tokio::test]
async fn paused_store_lags_behind_cache() {
    let store = Arc::new(MemoryStore::new());
    let view = Arc::new(FrameBuffer::new());
    let mut engine = InventoryEngine::load(Arc::clone(&store), view.clone(), options())
        .await
        .unwrap();

    store.pause_writes();
    let created = engine
        .create("Milk", 10, Money::from_cents(250), next_year())
        .unwrap();

    // The cache and the renderer already have the item; the store does not.
    assert_eq!(engine.len(), 1);
    assert_eq!(view.latest().unwrap().items.len(), 1);
    tokio::task::yield_now().await;
    assert!(store.is_empty().await);

    store.resume_writes();
    created.persist.wait().await.unwrap();
    assert_eq!(store.get_all().await.unwrap(), vec![created.value]);
}

#[tokio::test]
async fn put_then_delete_reach_store_in_order() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = memory_engine(Arc::clone(&store)).await;

    store.pause_writes();
    let id = engine
        .create("Milk", 10, Money::from_cents(250), next_year())
        .unwrap()
        .into_value()
        .id;
    let removed = engine.remove(&id).unwrap();
    store.resume_writes();

    removed.persist.wait().await.unwrap();
    assert!(store.is_empty().await);
    assert_eq!(store.completed_writes(), 2);
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn not_found_and_validation_leave_everything_untouched() {
    let store = Arc::new(MemoryStore::with_items(vec![item("a", "Milk", 10, 250, next_year())]));
    let mut engine = memory_engine(Arc::clone(&store)).await;

    assert!(engine.remove("nonexistent").unwrap_err().is_not_found());
    assert!(engine.set_quantity("nonexistent", 1).unwrap_err().is_not_found());
    assert!(engine.set_price("a", Money::from_cents(-1)).unwrap_err().is_validation());
    assert!(engine.create("Milk", -1, Money::from_cents(1), next_year()).unwrap_err().is_validation());

    engine.flush().await.unwrap();
    assert_eq!(engine.len(), 1);
    assert_eq!(store.completed_writes(), 0);
}

#[tokio::test]
async fn long_names_are_stored_unchanged() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = memory_engine(Arc::clone(&store)).await;

    let long = "A".repeat(201);
    let accented = "é".repeat(101);

    let created = engine
        .create(&long, 1, Money::from_cents(100), next_year())
        .unwrap();
    assert_eq!(created.value.name, long);
    let id = created.value.id.clone();
    created.persist.wait().await.unwrap();

    let renamed = engine.rename(&id, &accented).unwrap();
    renamed.persist.wait().await.unwrap();
    assert_eq!(store.get(&id).await.unwrap().unwrap().name, accented);
}

// ============================================================================
// Commands
// ============================================================================

#[tokio::test]
async fn json_commands_drive_the_engine() {
    let store = Arc::new(MemoryStore::with_items(vec![item("a", "Milk", 10, 250, yesterday())]));
    let mut engine = memory_engine(Arc::clone(&store)).await;

    let outcome = engine
        .dispatch(InventoryCommand::from_json(r#"{"type":"restock","id":"a","target":40}"#).unwrap())
        .unwrap()
        .into_value();
    assert!(matches!(outcome, CommandOutcome::Updated(ref i) if i.quantity == 40));

    let swept = engine
        .dispatch(InventoryCommand::from_json(r#"{"type":"sweep_expired"}"#).unwrap())
        .unwrap();
    assert_eq!(swept.value, CommandOutcome::Swept(vec!["a".to_string()]));
    swept.persist.wait().await.unwrap();

    assert!(engine.is_empty());
    assert!(store.is_empty().await);
}
