//! # stockroom-db: Store Adapter for Stockroom
//!
//! This crate provides the durable store that mirrors the engine's item
//! cache. It uses SQLite through sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  InventoryEngine persistence worker                                    │
//! │       │  put(item) / delete(id) / get_all()                            │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │   ItemStore    │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │  (store.rs)    │   │  (embedded)  │   │   │
//! │  │   │               │    │                │   │              │   │   │
//! │  │   │ SqlitePool    │◄───│ ItemRepository │   │ 001_items    │   │   │
//! │  │   │ open()        │    │ MemoryStore    │   │              │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL) : inventory_items + idx_inventory_items_name        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pool`] - Connection pool management (`Database`, `DbConfig`)
//! - [`migrations`] - Embedded SQL migrations
//! - [`error`] - Database error types
//! - [`store`] - The `ItemStore` contract and the in-memory store
//! - [`repository`] - SQLite implementation of `ItemStore`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig, ItemStore};
//!
//! let db = Database::open(DbConfig::new("path/to/stockroom.db")).await?;
//! let items = db.items().get_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::item::ItemRepository;
pub use store::{ItemStore, MemoryStore};
