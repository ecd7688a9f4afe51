//! # Repository Module
//!
//! SQLite implementations of the store contracts.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Persistence worker                                                     │
//! │       │  store.put(&item)                                               │
//! │       ▼                                                                 │
//! │  ItemRepository (impl ItemStore)                                        │
//! │  ├── get_all / get / find_by_name                                       │
//! │  ├── put     INSERT ... ON CONFLICT(id) DO UPDATE                       │
//! │  └── delete  DELETE ... WHERE id = ?                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite: inventory_items                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`item::ItemRepository`] - Inventory item persistence

pub mod item;
