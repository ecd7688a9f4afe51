//! # Renderer Commands
//!
//! User actions coming back from the table renderer, as data.
//!
//! ## Callback Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Renderer callback     InventoryCommand          Engine operation      │
//! │  ─────────────────     ────────────────          ────────────────      │
//! │  form submit           Create { .. }             create                │
//! │  onRename(id)          Rename { id, name }       rename                │
//! │  onSetQuantity(id)     SetQuantity { id, .. }    set_quantity          │
//! │  onSetPrice(id)        SetPrice { id, price }    set_price             │
//! │  onRemove(id)          Remove { id }             remove                │
//! │  onRestock(id)         Restock { id, target }    restock               │
//! │  onRestockAll()        RestockAll { target }     restock_all           │
//! │  onSweepExpired()      SweepExpired              sweep_expired         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands carry already-parsed values. Prompt text goes through
//! `stockroom_core::validation::parse_*` first.
//!
//! ## Wire Format
//! ```json
//! { "type": "set_quantity", "id": "5f0c...", "quantity": 12 }
//! { "type": "set_price", "id": "5f0c...", "price": 250 }
//! { "type": "sweep_expired" }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stockroom_core::{InventoryItem, Money};

/// A user action routed to [`crate::InventoryEngine::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryCommand {
    Create {
        name: String,
        quantity: i64,
        /// Unit price in cents.
        price: Money,
        expiration_date: NaiveDate,
    },
    Rename {
        id: String,
        name: String,
    },
    SetQuantity {
        id: String,
        quantity: i64,
    },
    SetPrice {
        id: String,
        price: Money,
    },
    Remove {
        id: String,
    },
    Restock {
        id: String,
        target: i64,
    },
    RestockAll {
        target: i64,
    },
    SweepExpired,
}

impl InventoryCommand {
    /// Parses a command from the renderer's JSON payload.
    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }
}

/// What a dispatched command did to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A new item was added.
    Created(InventoryItem),
    /// An existing item now reads like this.
    Updated(InventoryItem),
    /// The item was removed.
    Removed(InventoryItem),
    /// Ids whose quantity a restock-all raised.
    Restocked(Vec<String>),
    /// Ids the expiration sweep removed.
    Swept(Vec<String>),
}
