//! # Inventory Engine
//!
//! Mediates every mutation between the item cache and the store.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One Mutating Operation                             │
//! │                                                                         │
//! │  1. Validate input            ──► ValidationError, nothing changed     │
//! │  2. Look up id in the cache   ──► NotFound, nothing changed            │
//! │  3. Mutate the cache          (synchronous, the source of truth)       │
//! │  4. Queue the store write     (PersistHandle, never awaited here)      │
//! │  5. Summarize + render        (view sees the new snapshot at once)     │
//! │  6. Return Mutation { value, persist }                                 │
//! │                                                                         │
//! │  The store may lag the cache. A failed write is logged and reported    │
//! │  through the handle only; the cache change stands.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Mutations take `&mut self`, so two of them can never interleave. Readers
//! get a [`Snapshot`] that stays valid across later mutations.

use std::sync::Arc;

use chrono::NaiveDate;
use stockroom_core::validation::{
    validate_item_name, validate_price, validate_quantity, validate_restock_target,
};
use stockroom_core::{summarize, InventoryItem, Money, SignalMode, SummaryRecord};
use stockroom_db::ItemStore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::{ItemCache, Snapshot};
use crate::clock::{Clock, SystemClock};
use crate::command::{CommandOutcome, InventoryCommand};
use crate::error::{EngineError, EngineResult, PersistError};
use crate::persist::{PersistHandle, PersistQueue, PersistStats};
use crate::view::InventoryView;

// =============================================================================
// Options
// =============================================================================

/// Runtime knobs for the engine.
#[derive(Clone)]
pub struct EngineOptions {
    /// How the summary derives spoilage and restock signals.
    pub signal_mode: SignalMode,

    /// Source of "today".
    pub clock: Arc<dyn Clock>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            signal_mode: SignalMode::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl std::fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineOptions")
            .field("signal_mode", &self.signal_mode)
            .field("today", &self.clock.today())
            .finish()
    }
}

impl EngineOptions {
    pub fn with_signal_mode(mut self, mode: SignalMode) -> Self {
        self.signal_mode = mode;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}

// =============================================================================
// Mutation Result
// =============================================================================

/// Result of a successful mutating operation.
///
/// `value` reflects the cache, which already changed. `persist` tracks the
/// store write(s) the operation queued; drop it or await it.
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub persist: PersistHandle,
}

impl<T> Mutation<T> {
    fn new(value: T, persist: PersistHandle) -> Self {
        Mutation { value, persist }
    }

    /// Transforms the value, keeping the same persistence handle.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mutation<U> {
        Mutation {
            value: f(self.value),
            persist: self.persist,
        }
    }

    /// Drops the handle and keeps the value (fire-and-forget).
    pub fn into_value(self) -> T {
        self.value
    }

    /// Waits for the store and returns the value with the store outcome.
    pub async fn persisted(self) -> (T, Result<(), PersistError>) {
        let outcome = self.persist.wait().await;
        (self.value, outcome)
    }
}

// =============================================================================
// Inventory Engine
// =============================================================================

/// Owner of the item cache and driver of store persistence.
pub struct InventoryEngine<S: ItemStore> {
    store: Arc<S>,
    cache: ItemCache,
    queue: PersistQueue,
    view: Arc<dyn InventoryView>,
    options: EngineOptions,
}

impl<S: ItemStore> InventoryEngine<S> {
    /// Starts the persistence worker and rehydrates the cache from `store`.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn load(
        store: Arc<S>,
        view: Arc<dyn InventoryView>,
        options: EngineOptions,
    ) -> EngineResult<Self> {
        let queue = PersistQueue::spawn(Arc::clone(&store));

        let mut engine = InventoryEngine {
            store,
            cache: ItemCache::new(),
            queue,
            view,
            options,
        };
        engine.load_all().await?;

        Ok(engine)
    }

    // =========================================================================
    // Rehydration
    // =========================================================================

    /// Replaces the cache with the full store contents and renders.
    ///
    /// Writes still queued are not awaited; call [`Self::flush`] first to
    /// read them back.
    pub async fn load_all(&mut self) -> EngineResult<usize> {
        let items = self.store.get_all().await?;

        let dropped = self.cache.replace_all(items);
        if dropped > 0 {
            warn!(dropped, "Store returned duplicate ids, kept the first of each");
        }

        info!(count = self.cache.len(), "Inventory loaded from store");
        self.publish();
        Ok(self.cache.len())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a new item under a freshly generated id.
    pub fn create(
        &mut self,
        name: &str,
        quantity: i64,
        price: Money,
        expiration_date: NaiveDate,
    ) -> EngineResult<Mutation<InventoryItem>> {
        let name = validate_item_name(name)?;
        validate_quantity(quantity)?;
        validate_price(price)?;

        let item = InventoryItem {
            id: self.fresh_id(),
            name,
            quantity,
            price,
            expiration_date,
        };

        self.cache.push(item.clone());
        let persist = self.queue.put(item.clone());

        debug!(id = %item.id, name = %item.name, "Item created");
        self.publish();
        Ok(Mutation::new(item, persist))
    }

    /// Renames an item. Renaming to the current name writes nothing.
    pub fn rename(&mut self, id: &str, new_name: &str) -> EngineResult<Mutation<InventoryItem>> {
        let name = validate_item_name(new_name)?;
        let current = self.require(id)?;

        if current.name == name {
            return Ok(Mutation::new(current.clone(), PersistHandle::completed()));
        }

        self.write_through(id, |item| item.name = name)
    }

    /// Sets an item's quantity.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> EngineResult<Mutation<InventoryItem>> {
        validate_quantity(quantity)?;
        self.require(id)?;
        self.write_through(id, |item| item.quantity = quantity)
    }

    /// Sets an item's unit price.
    pub fn set_price(&mut self, id: &str, price: Money) -> EngineResult<Mutation<InventoryItem>> {
        validate_price(price)?;
        self.require(id)?;
        self.write_through(id, |item| item.price = price)
    }

    /// Raises an item's quantity to `target`; never lowers it.
    pub fn restock(&mut self, id: &str, target: i64) -> EngineResult<Mutation<InventoryItem>> {
        validate_restock_target(target)?;

        let (item, persist) = self.restock_entry(id, target)?;
        if let Some(persist) = persist {
            self.publish();
            return Ok(Mutation::new(item, persist));
        }

        Ok(Mutation::new(item, PersistHandle::completed()))
    }

    /// Restocks every item to `target`, returning the ids that changed.
    ///
    /// Each item gets its own store write; one failing does not stop the
    /// others.
    pub fn restock_all(&mut self, target: i64) -> EngineResult<Mutation<Vec<String>>> {
        validate_restock_target(target)?;

        let snapshot = self.cache.snapshot();
        let mut changed = Vec::new();
        let mut persist = PersistHandle::completed();

        for item in snapshot.iter() {
            if let Ok((_, Some(handle))) = self.restock_entry(&item.id, target) {
                changed.push(item.id.clone());
                persist.merge(handle);
            }
        }

        info!(target, changed = changed.len(), "Restocked all items");
        if !changed.is_empty() {
            self.publish();
        }
        Ok(Mutation::new(changed, persist))
    }

    /// Removes an item from the cache and queues its store delete.
    pub fn remove(&mut self, id: &str) -> EngineResult<Mutation<InventoryItem>> {
        let (item, persist) = self.remove_entry(id)?;
        self.publish();
        Ok(Mutation::new(item, persist))
    }

    /// Routes a renderer command to the matching operation.
    pub fn dispatch(&mut self, command: InventoryCommand) -> EngineResult<Mutation<CommandOutcome>> {
        debug!(?command, "Dispatching command");

        let mutation = match command {
            InventoryCommand::Create {
                name,
                quantity,
                price,
                expiration_date,
            } => self
                .create(&name, quantity, price, expiration_date)?
                .map(CommandOutcome::Created),
            InventoryCommand::Rename { id, name } => {
                self.rename(&id, &name)?.map(CommandOutcome::Updated)
            }
            InventoryCommand::SetQuantity { id, quantity } => {
                self.set_quantity(&id, quantity)?.map(CommandOutcome::Updated)
            }
            InventoryCommand::SetPrice { id, price } => {
                self.set_price(&id, price)?.map(CommandOutcome::Updated)
            }
            InventoryCommand::Remove { id } => self.remove(&id)?.map(CommandOutcome::Removed),
            InventoryCommand::Restock { id, target } => {
                self.restock(&id, target)?.map(CommandOutcome::Updated)
            }
            InventoryCommand::RestockAll { target } => {
                self.restock_all(target)?.map(CommandOutcome::Restocked)
            }
            InventoryCommand::SweepExpired => self.sweep_expired().map(CommandOutcome::Swept),
        };

        Ok(mutation)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Frozen view of the cache.
    pub fn snapshot(&self) -> Snapshot {
        self.cache.snapshot()
    }

    /// Summary of the current cache as of today.
    pub fn summary(&self) -> SummaryRecord {
        summarize(
            &self.cache.snapshot(),
            self.options.clock.today(),
            self.options.signal_mode,
        )
    }

    /// Copy of the item with `id`, if cached.
    pub fn get(&self, id: &str) -> Option<InventoryItem> {
        self.cache.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// The store this engine persists to.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Persistence outcome counters.
    pub fn persist_stats(&self) -> Arc<PersistStats> {
        Arc::clone(self.queue.stats())
    }

    /// Waits until every store write queued so far has run.
    ///
    /// Succeeds even if some of those writes failed; failures are reported
    /// through their own handles and the log.
    pub async fn flush(&self) -> Result<(), PersistError> {
        self.queue.flush().await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn today(&self) -> NaiveDate {
        self.options.clock.today()
    }

    fn require(&self, id: &str) -> EngineResult<&InventoryItem> {
        self.cache
            .get(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    /// UUID v4, regenerated in the (practically impossible) case it is taken.
    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.cache.contains(&id) {
                return id;
            }
            warn!(id = %id, "Generated id already in cache, regenerating");
        }
    }

    fn write_through<F>(&mut self, id: &str, f: F) -> EngineResult<Mutation<InventoryItem>>
    where
        F: FnOnce(&mut InventoryItem),
    {
        let updated = self
            .cache
            .update(id, f)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let persist = self.queue.put(updated.clone());

        debug!(id = %id, "Item updated");
        self.publish();
        Ok(Mutation::new(updated, persist))
    }

    /// Restocks one entry without rendering. `None` means nothing changed.
    fn restock_entry(
        &mut self,
        id: &str,
        target: i64,
    ) -> EngineResult<(InventoryItem, Option<PersistHandle>)> {
        let current = self.require(id)?;
        if current.quantity >= target {
            return Ok((current.clone(), None));
        }

        let updated = self
            .cache
            .update(id, |item| item.quantity = target)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let persist = self.queue.put(updated.clone());

        debug!(id = %id, target, "Item restocked");
        Ok((updated, Some(persist)))
    }

    /// Removes one entry without rendering.
    pub(crate) fn remove_entry(&mut self, id: &str) -> EngineResult<(InventoryItem, PersistHandle)> {
        let item = self
            .cache
            .remove(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let persist = self.queue.delete(item.id.clone());

        debug!(id = %id, "Item removed");
        Ok((item, persist))
    }

    /// Recomputes the summary and hands the new frame to the view.
    pub(crate) fn publish(&self) {
        let snapshot = self.cache.snapshot();
        let summary = summarize(&snapshot, self.today(), self.options.signal_mode);
        self.view.render(&snapshot, &summary);
    }
}

impl<S: ItemStore> std::fmt::Debug for InventoryEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryEngine")
            .field("items", &self.cache.len())
            .field("options", &self.options)
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::view::{FrameBuffer, NoOpView};
    use std::collections::HashSet;
    use stockroom_db::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn next_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn options() -> EngineOptions {
        EngineOptions::default().with_clock(FixedClock(today()))
    }

    async fn engine() -> InventoryEngine<MemoryStore> {
        InventoryEngine::load(Arc::new(MemoryStore::new()), Arc::new(NoOpView), options())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_generates_unique_ids() {
        let mut engine = engine().await;
        let mut ids = HashSet::new();

        for i in 0..2_000 {
            let item = engine
                .create(&format!("Item {i}"), 1, Money::from_cents(100), next_year())
                .unwrap()
                .into_value();
            assert!(ids.insert(item.id));
        }

        assert_eq!(engine.len(), 2_000);
        engine.flush().await.unwrap();
        assert_eq!(engine.store().len().await, 2_000);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_values() {
        let mut engine = engine().await;

        let err = engine
            .create("Milk", -1, Money::from_cents(250), next_year())
            .unwrap_err();
        assert!(err.is_validation());

        let err = engine
            .create("Milk", 1, Money::from_cents(-1), next_year())
            .unwrap_err();
        assert!(err.is_validation());

        let err = engine
            .create("   ", 1, Money::from_cents(1), next_year())
            .unwrap_err();
        assert!(err.is_validation());

        assert!(engine.is_empty());
        engine.flush().await.unwrap();
        assert_eq!(engine.store().completed_writes(), 0);
    }

    #[tokio::test]
    async fn test_set_quantity_rejects_negative() {
        let mut engine = engine().await;
        let id = engine
            .create("Milk", 10, Money::from_cents(250), next_year())
            .unwrap()
            .value
            .id;

        let err = engine.set_quantity(&id, -5).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(engine.get(&id).unwrap().quantity, 10);

        let updated = engine.set_quantity(&id, 4).unwrap().value;
        assert_eq!(updated.quantity, 4);
    }

    #[tokio::test]
    async fn test_restock_never_lowers() {
        let mut engine = engine().await;
        let high = engine
            .create("Flour", 80, Money::from_cents(199), next_year())
            .unwrap()
            .value
            .id;
        let low = engine
            .create("Sugar", 20, Money::from_cents(149), next_year())
            .unwrap()
            .value
            .id;

        let untouched = engine.restock(&high, 50).unwrap();
        assert_eq!(untouched.value.quantity, 80);
        assert!(untouched.persist.is_noop());

        let raised = engine.restock(&low, 50).unwrap();
        assert_eq!(raised.value.quantity, 50);
        assert_eq!(raised.persist.writes(), 1);

        assert!(engine.restock(&low, 0).unwrap_err().is_validation());
        assert!(engine.restock("missing", 10).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_restock_all_reports_changed_ids() {
        let mut engine = engine().await;
        let full = engine
            .create("Flour", 80, Money::from_cents(199), next_year())
            .unwrap()
            .value
            .id;
        let empty = engine
            .create("Sugar", 0, Money::from_cents(149), next_year())
            .unwrap()
            .value
            .id;

        let mutation = engine.restock_all(50).unwrap();
        assert_eq!(mutation.value, vec![empty.clone()]);
        mutation.persist.wait().await.unwrap();

        assert_eq!(engine.get(&full).unwrap().quantity, 80);
        assert_eq!(engine.get(&empty).unwrap().quantity, 50);
        assert!(engine.restock_all(-3).unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_rename_rules() {
        let mut engine = engine().await;
        let id = engine
            .create("Milk", 1, Money::from_cents(250), next_year())
            .unwrap()
            .value
            .id;

        assert!(engine.rename(&id, "").unwrap_err().is_validation());
        assert!(engine.rename("missing", "Oat Milk").unwrap_err().is_not_found());

        let same = engine.rename(&id, "Milk").unwrap();
        assert!(same.persist.is_noop());

        let renamed = engine.rename(&id, "  Oat Milk ").unwrap();
        assert_eq!(renamed.value.name, "Oat Milk");
        renamed.persist.wait().await.unwrap();
        assert_eq!(engine.store().get(&id).await.unwrap().unwrap().name, "Oat Milk");
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let mut engine = engine().await;
        engine
            .create("Milk", 1, Money::from_cents(250), next_year())
            .unwrap();

        let err = engine.remove("nonexistent").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(engine.len(), 1);
    }

    #[tokio::test]
    async fn test_every_mutation_renders() {
        let view = Arc::new(FrameBuffer::new());
        let mut engine =
            InventoryEngine::load(Arc::new(MemoryStore::new()), view.clone(), options())
                .await
                .unwrap();
        assert_eq!(view.renders(), 1);

        let id = engine
            .create("Milk", 10, Money::from_cents(250), next_year())
            .unwrap()
            .value
            .id;
        engine.set_price(&id, Money::from_cents(300)).unwrap();
        let _ = engine.set_quantity(&id, -1);

        assert_eq!(view.renders(), 3);
        let frame = view.latest().unwrap();
        assert_eq!(frame.items.len(), 1);
        assert_eq!(frame.summary.total_value, Money::from_cents(3000));
    }

    #[tokio::test]
    async fn test_dispatch_routes_commands() {
        let mut engine = engine().await;

        let created = engine
            .dispatch(InventoryCommand::Create {
                name: "Eggs".into(),
                quantity: 12,
                price: Money::from_cents(400),
                expiration_date: next_year(),
            })
            .unwrap()
            .into_value();
        let item = match created {
            CommandOutcome::Created(item) => item,
            other => panic!("expected Created, got {other:?}"),
        };

        let outcome = engine
            .dispatch(InventoryCommand::Remove { id: item.id.clone() })
            .unwrap()
            .into_value();
        assert_eq!(outcome, CommandOutcome::Removed(item));
        assert!(engine.is_empty());
    }
}
