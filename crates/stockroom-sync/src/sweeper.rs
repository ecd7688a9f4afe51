//! # Expiration Sweeper
//!
//! Removes every spoiled item through the engine's normal remove path.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  snapshot ──► expired_ids(snapshot, today) ──► remove each id          │
//! │                                                                         │
//! │  • One pass over the snapshot taken at sweep start, no re-scan         │
//! │  • Each removal queues its own store delete                            │
//! │  • One render at the end                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockroom_core::expired_ids;
use stockroom_db::ItemStore;
use tracing::info;

use crate::engine::{InventoryEngine, Mutation};
use crate::persist::PersistHandle;

impl<S: ItemStore> InventoryEngine<S> {
    /// Removes every item whose expiration date is today or earlier.
    ///
    /// Returns the removed ids, in cache order.
    pub fn sweep_expired(&mut self) -> Mutation<Vec<String>> {
        let today = self.today();
        let snapshot = self.snapshot();
        let selected = expired_ids(&snapshot, today);

        let mut removed = Vec::with_capacity(selected.len());
        let mut persist = PersistHandle::completed();

        for id in selected {
            // Every selected id came from the snapshot and nothing else
            // mutates the cache during the sweep.
            if let Ok((_, handle)) = self.remove_entry(&id) {
                persist.merge(handle);
                removed.push(id);
            }
        }

        info!(%today, removed = removed.len(), "Expiration sweep finished");
        if !removed.is_empty() {
            self.publish();
        }

        Mutation { value: removed, persist }
    }
}
