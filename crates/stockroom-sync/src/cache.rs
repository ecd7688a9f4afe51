//! # Item Cache
//!
//! The authoritative in-memory collection of items.
//!
//! ## Snapshot Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Copy-on-Write Snapshots                              │
//! │                                                                         │
//! │  ItemCache ──► Arc<Vec<InventoryItem>> ◄── Snapshot (renderer)         │
//! │                        │                                                │
//! │  mutation ─────────────┘                                                │
//! │     Arc::make_mut: clones the Vec only while a snapshot is alive,      │
//! │     so a snapshot taken before a mutation never changes under its      │
//! │     reader.                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the engine mutates the cache; every mutator is crate-private.

use std::ops::Deref;
use std::sync::Arc;

use stockroom_core::InventoryItem;

// =============================================================================
// Snapshot
// =============================================================================

/// Frozen, cheaply clonable view of the cache at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot(Arc<Vec<InventoryItem>>);

impl Snapshot {
    /// Items in cache order.
    pub fn items(&self) -> &[InventoryItem] {
        &self.0
    }

    /// Clones the items out of the snapshot.
    pub fn to_vec(&self) -> Vec<InventoryItem> {
        self.0.as_ref().clone()
    }
}

impl Deref for Snapshot {
    type Target = [InventoryItem];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// =============================================================================
// Item Cache
// =============================================================================

/// Ordered collection of items keyed by id, with no duplicate ids.
#[derive(Debug, Default)]
pub struct ItemCache {
    items: Arc<Vec<InventoryItem>>,
}

impl ItemCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Takes an immutable snapshot sharing storage with the cache.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(Arc::clone(&self.items))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Appends a new item. The caller guarantees the id is unused.
    pub(crate) fn push(&mut self, item: InventoryItem) {
        debug_assert!(!self.contains(&item.id));
        Arc::make_mut(&mut self.items).push(item);
    }

    /// Applies `f` to the item with `id` and returns the updated item.
    pub(crate) fn update<F>(&mut self, id: &str, f: F) -> Option<InventoryItem>
    where
        F: FnOnce(&mut InventoryItem),
    {
        let index = self.position(id)?;
        let item = &mut Arc::make_mut(&mut self.items)[index];
        f(item);
        Some(item.clone())
    }

    /// Removes and returns the item with `id`, keeping the order of the rest.
    pub(crate) fn remove(&mut self, id: &str) -> Option<InventoryItem> {
        let index = self.position(id)?;
        Some(Arc::make_mut(&mut self.items).remove(index))
    }

    /// Replaces the whole collection, dropping duplicate ids after the first.
    ///
    /// Returns the number of duplicates dropped.
    pub(crate) fn replace_all(&mut self, items: Vec<InventoryItem>) -> usize {
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        let total = items.len();
        let unique: Vec<InventoryItem> = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        let dropped = total - unique.len();
        self.items = Arc::new(unique);
        dropped
    }
}
