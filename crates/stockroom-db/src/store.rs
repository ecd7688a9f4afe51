//! # Item Store Contract
//!
//! The key-value contract the synchronization engine persists through.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ItemStore                                        │
//! │                                                                         │
//! │   get_all()        every record, insertion order                       │
//! │   get(id)          one record or None                                  │
//! │   put(item)        upsert: insert if id absent, replace if present     │
//! │   delete(id)       Ok(false) when id absent, never an error            │
//! │   find_by_name(n)  lookup through the non-unique name index            │
//! │                                                                         │
//! │   Implementations:                                                     │
//! │   ├── ItemRepository  (SQLite, repository/item.rs)                     │
//! │   └── MemoryStore     (in-process, failure injection for tests)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation is asynchronous and can fail on its own; the returned
//! futures are `Send` so the engine can drive them from a spawned task.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use stockroom_core::InventoryItem;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::error::{DbError, DbResult};

// =============================================================================
// Store Trait
// =============================================================================

/// Durable key-value store of inventory items, keyed by `id`.
pub trait ItemStore: Send + Sync + 'static {
    /// Returns every stored item.
    fn get_all(&self) -> impl Future<Output = DbResult<Vec<InventoryItem>>> + Send;

    /// Returns the item with `id`, if stored.
    fn get(&self, id: &str) -> impl Future<Output = DbResult<Option<InventoryItem>>> + Send;

    /// Inserts or fully replaces the record for `item.id`.
    fn put(&self, item: &InventoryItem) -> impl Future<Output = DbResult<()>> + Send;

    /// Deletes the record for `id`. Returns whether a record was removed.
    fn delete(&self, id: &str) -> impl Future<Output = DbResult<bool>> + Send;

    /// Returns every item whose name equals `name` exactly.
    fn find_by_name(&self, name: &str) -> impl Future<Output = DbResult<Vec<InventoryItem>>> + Send;
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-process [`ItemStore`] with switches for simulating a misbehaving store.
///
/// - [`MemoryStore::fail_writes`] makes `put`/`delete` return
///   [`DbError::Unavailable`] without touching the data.
/// - [`MemoryStore::pause_writes`] parks writes until
///   [`MemoryStore::resume_writes`], so the store visibly lags the cache.
#[derive(Debug)]
pub struct MemoryStore {
    items: Mutex<Vec<InventoryItem>>,
    fail_writes: AtomicBool,
    paused: watch::Sender<bool>,
    completed_writes: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore {
            items: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
            paused: watch::Sender::new(false),
            completed_writes: AtomicUsize::new(0),
        }
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `items`.
    pub fn with_items(items: Vec<InventoryItem>) -> Self {
        MemoryStore {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    /// Makes every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Parks writes until [`MemoryStore::resume_writes`] is called.
    pub fn pause_writes(&self) {
        self.paused.send_replace(true);
    }

    /// Releases parked writes.
    pub fn resume_writes(&self) {
        self.paused.send_replace(false);
    }

    /// Number of writes that reached the data (successful put/delete calls).
    pub fn completed_writes(&self) -> usize {
        self.completed_writes.load(Ordering::SeqCst)
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    async fn admit_write(&self, op: &str) -> DbResult<()> {
        let mut paused = self.paused.subscribe();
        loop {
            let is_paused = *paused.borrow_and_update();
            if !is_paused {
                break;
            }
            // The sender lives in `self`, so the channel cannot close here.
            if paused.changed().await.is_err() {
                break;
            }
        }

        if self.fail_writes.load(Ordering::SeqCst) {
            debug!(op, "Memory store rejecting write");
            return Err(DbError::Unavailable(format!("{op} rejected by memory store")));
        }

        Ok(())
    }
}

impl ItemStore for MemoryStore {
    async fn get_all(&self) -> DbResult<Vec<InventoryItem>> {
        Ok(self.items.lock().await.clone())
    }

    async fn get(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let items = self.items.lock().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn put(&self, item: &InventoryItem) -> DbResult<()> {
        self.admit_write("put").await?;

        let mut items = self.items.lock().await;
        match items.iter_mut().find(|stored| stored.id == item.id) {
            Some(stored) => *stored = item.clone(),
            None => items.push(item.clone()),
        }

        self.completed_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DbResult<bool> {
        self.admit_write("delete").await?;

        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|item| item.id != id);

        self.completed_writes.fetch_add(1, Ordering::SeqCst);
        Ok(items.len() != before)
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Vec<InventoryItem>> {
        let items = self.items.lock().await;
        Ok(items.iter().filter(|item| item.name == name).cloned().collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use stockroom_core::Money;

    fn item(id: &str, name: &str, quantity: i64) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: name.to_string(),
            quantity,
            price: Money::from_cents(250),
            expiration_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_put_upserts() {
        let store = MemoryStore::new();

        store.put(&item("a", "Milk", 1)).await.unwrap();
        store.put(&item("b", "Bread", 2)).await.unwrap();
        store.put(&item("a", "Milk", 9)).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "a");
        assert_eq!(all[0].quantity, 9);
        assert_eq!(store.completed_writes(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_an_error() {
        let store = MemoryStore::with_items(vec![item("a", "Milk", 1)]);

        assert!(!store.delete("nope").await.unwrap());
        assert!(store.delete("a").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_writes_leave_data_untouched() {
        let store = MemoryStore::with_items(vec![item("a", "Milk", 1)]);
        store.fail_writes(true);

        assert!(matches!(
            store.put(&item("a", "Milk", 5)).await,
            Err(DbError::Unavailable(_))
        ));
        assert!(store.delete("a").await.is_err());
        assert_eq!(store.get("a").await.unwrap().unwrap().quantity, 1);
        assert_eq!(store.completed_writes(), 0);

        store.fail_writes(false);
        store.put(&item("a", "Milk", 5)).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_paused_writes_wait_for_resume() {
        let store = Arc::new(MemoryStore::new());
        store.pause_writes();

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.put(&item("a", "Milk", 1)).await })
        };

        tokio::task::yield_now().await;
        assert!(store.is_empty().await);

        store.resume_writes();
        writer.await.unwrap().unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let store = MemoryStore::with_items(vec![
            item("a", "Milk", 1),
            item("b", "Bread", 1),
            item("c", "Milk", 2),
        ]);

        let milk = store.find_by_name("Milk").await.unwrap();
        assert_eq!(milk.len(), 2);
        assert!(store.find_by_name("Tea").await.unwrap().is_empty());
    }
}
